// Copyright 2023 The stm32f30x-ports authors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! GPIO register block layout.
//!
//! The layout matches the STM32F30x reference manual. Every access goes through
//! [`Reg`], which only ever touches the hardware with volatile loads and stores.

use core::cell::UnsafeCell;
use core::ptr;

/// A 32-bit memory-mapped register.
#[repr(transparent)]
pub struct Reg {
    value: UnsafeCell<u32>,
}

impl Reg {
    /// Creates a register holding `value`.
    ///
    /// Only useful for register blocks that live in ordinary memory, e.g. when
    /// simulating a port on the host.
    pub const fn new(value: u32) -> Self {
        Self {
            value: UnsafeCell::new(value),
        }
    }

    /// Reads the register.
    #[inline(always)]
    pub fn read(&self) -> u32 {
        // NOTE(unsafe) volatile read of a register we hold a reference to
        unsafe { ptr::read_volatile(self.value.get()) }
    }

    /// Writes `bits` to the register.
    #[inline(always)]
    pub fn write(&self, bits: u32) {
        // NOTE(unsafe) volatile write of a register we hold a reference to
        unsafe { ptr::write_volatile(self.value.get(), bits) }
    }

    /// Read-modify-write. Not atomic.
    #[inline(always)]
    pub fn modify(&self, f: impl FnOnce(u32) -> u32) {
        self.write(f(self.read()));
    }
}

/// GPIO port registers.
#[repr(C)]
pub struct RegisterBlock {
    /// 0x00 - mode, 2 bits per pin
    pub moder: Reg,
    /// 0x04 - output type, 1 bit per pin
    pub otyper: Reg,
    /// 0x08 - output speed, 2 bits per pin
    pub ospeedr: Reg,
    /// 0x0c - pull-up/pull-down, 2 bits per pin
    pub pupdr: Reg,
    /// 0x10 - input data
    pub idr: Reg,
    /// 0x14 - output data
    pub odr: Reg,
    /// 0x18 - bit set (low half) / reset (high half)
    pub bsrr: Reg,
    /// 0x1c - configuration lock
    pub lckr: Reg,
    /// 0x20 - alternate function, 4 bits per pin; pins 0-7 then 8-15
    pub afr: [Reg; 2],
    /// 0x28 - bit reset
    pub brr: Reg,
}

impl RegisterBlock {
    /// A register block with every register cleared.
    pub const fn new() -> Self {
        Self {
            moder: Reg::new(0),
            otyper: Reg::new(0),
            ospeedr: Reg::new(0),
            pupdr: Reg::new(0),
            idr: Reg::new(0),
            odr: Reg::new(0),
            bsrr: Reg::new(0),
            lckr: Reg::new(0),
            afr: [Reg::new(0), Reg::new(0)],
            brr: Reg::new(0),
        }
    }
}

impl Default for RegisterBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem::{offset_of, size_of};

    #[test]
    fn layout_matches_reference_manual() {
        assert_eq!(offset_of!(RegisterBlock, moder), 0x00);
        assert_eq!(offset_of!(RegisterBlock, otyper), 0x04);
        assert_eq!(offset_of!(RegisterBlock, ospeedr), 0x08);
        assert_eq!(offset_of!(RegisterBlock, pupdr), 0x0c);
        assert_eq!(offset_of!(RegisterBlock, idr), 0x10);
        assert_eq!(offset_of!(RegisterBlock, odr), 0x14);
        assert_eq!(offset_of!(RegisterBlock, bsrr), 0x18);
        assert_eq!(offset_of!(RegisterBlock, lckr), 0x1c);
        assert_eq!(offset_of!(RegisterBlock, afr), 0x20);
        assert_eq!(offset_of!(RegisterBlock, brr), 0x28);
        assert_eq!(size_of::<RegisterBlock>(), 0x2c);
    }

    #[test]
    fn modify_reads_then_writes() {
        let reg = Reg::new(0xf0);
        reg.modify(|r| r | 0x0f);
        assert_eq!(reg.read(), 0xff);
        reg.write(0x1234_5678);
        assert_eq!(reg.read(), 0x1234_5678);
    }
}
