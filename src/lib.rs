// Copyright 2023 The stm32f30x-ports authors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # GPIO ports for the STM32F30x family of microcontrollers
//!
//! Port-level access to the six GPIO banks of the STM32F30x, plus typed pin
//! handles implementing the [`embedded-hal`] digital traits.
//!
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal
//!
//! # Usage
//!
//! ```no_run
//! use stm32f30x_ports::gpio::{Configuration, DriverType, Porta, Portb};
//!
//! Porta::enable();
//! Portb::enable();
//!
//! // PA5 and PA6 as open-drain outputs
//! Porta::set_configuration(0b0110_0000, Configuration::Out);
//! Porta::set_driver_type(0b0110_0000, DriverType::OpenDrain);
//! Porta::clear_and_set(0b0100_0000, 0b0010_0000);
//!
//! // PB6 and PB7 on alternate function 4
//! Portb::alt_func_number(0b1100_0000, 4);
//! Portb::set_configuration(0b1100_0000, Configuration::AltFunc);
//! ```
//!
//! ## Features
//!
//! - `defmt`: `defmt::Format` for the configuration types and `defmt` logging.
//! - `log`: logging through the `log` facade.

#![cfg_attr(not(test), no_std)]
#![deny(rustdoc::broken_intra_doc_links)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod bits;
pub mod gpio;
pub mod prelude;
pub mod rcc;
pub mod regs;
