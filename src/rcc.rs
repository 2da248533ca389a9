// Copyright 2023 The stm32f30x-ports authors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Peripheral clock gating for the GPIO ports.

use crate::regs::Reg;

/// Address of the RCC AHB peripheral clock enable register (`RCC_AHBENR`).
const AHBENR: usize = 0x4002_1000 + 0x14;

/// Switches the peripheral clock of a single port on and off.
pub trait ClockGate {
    /// Starts the peripheral clock.
    fn enable();

    /// Stops the peripheral clock.
    fn disable();
}

/// Clock gate backed by bit `BIT` of `RCC_AHBENR`.
///
/// `AHBENR` is shared by every AHB peripheral, so the read-modify-write runs
/// inside a critical section.
pub struct AhbClock<const BIT: u8>;

impl<const BIT: u8> AhbClock<BIT> {
    const MASK: u32 = 1 << BIT;

    #[inline(always)]
    fn ahbenr() -> &'static Reg {
        // NOTE(unsafe) RCC is always mapped; AHBENR is only touched through `modify`
        unsafe { &*(AHBENR as *const Reg) }
    }

    /// Sets or clears this gate's enable bit in `ahbenr`, leaving the other
    /// peripherals' bits as they are.
    #[inline(always)]
    fn gate(ahbenr: &Reg, on: bool) {
        critical_section::with(|_| {
            ahbenr.modify(|r| if on { r | Self::MASK } else { r & !Self::MASK })
        });
    }
}

impl<const BIT: u8> ClockGate for AhbClock<BIT> {
    fn enable() {
        Self::gate(Self::ahbenr(), true);
    }

    fn disable() {
        Self::gate(Self::ahbenr(), false);
    }
}

/// `IOPAEN`
pub type GpioaClock = AhbClock<17>;
/// `IOPBEN`
pub type GpiobClock = AhbClock<18>;
/// `IOPCEN`
pub type GpiocClock = AhbClock<19>;
/// `IOPDEN`
pub type GpiodClock = AhbClock<20>;
/// `IOPEEN`
pub type GpioeClock = AhbClock<21>;
/// `IOPFEN`
pub type GpiofClock = AhbClock<22>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_clocks_use_consecutive_enable_bits() {
        assert_eq!(GpioaClock::MASK, 1 << 17);
        assert_eq!(GpiobClock::MASK, 1 << 18);
        assert_eq!(GpiofClock::MASK, 1 << 22);
    }

    #[test]
    fn gating_one_port_keeps_other_enable_bits() {
        // SRAM and FLITF clocks on, as after reset, plus GPIOB.
        let ahbenr = Reg::new(0x0000_0014 | 1 << 18);

        GpioaClock::gate(&ahbenr, true);
        assert_eq!(ahbenr.read(), 0x0000_0014 | 1 << 17 | 1 << 18);

        GpioaClock::gate(&ahbenr, true);
        assert_eq!(ahbenr.read(), 0x0000_0014 | 1 << 17 | 1 << 18);

        GpiobClock::gate(&ahbenr, false);
        assert_eq!(ahbenr.read(), 0x0000_0014 | 1 << 17);

        GpioaClock::gate(&ahbenr, false);
        assert_eq!(ahbenr.read(), 0x0000_0014);
    }
}
