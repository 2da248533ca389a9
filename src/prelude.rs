// Copyright 2023 The stm32f30x-ports authors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0

pub use crate::gpio::PinExt as _stm32f30x_ports_gpio_PinExt;
pub use crate::rcc::ClockGate as _stm32f30x_ports_rcc_ClockGate;
pub use embedded_hal::prelude::*;
