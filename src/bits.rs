// Copyright 2023 The stm32f30x-ports authors.
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-pin bit field packing.
//!
//! The GPIO configuration registers hold a fixed-width field for every pin. The
//! functions in this module write one configuration code into the fields of any
//! subset of pins at once, without looping over the pins: the pin mask is
//! spread out so that each selected pin owns the lowest bit of its field, and
//! the code is then broadcast into every selected field with a single
//! multiplication. Lanes never overlap and codes are truncated to the field
//! width, so the multiplication cannot carry into a neighbouring field.

/// Spreads a 16-bit pin mask so that pin `i` lands on bit `2 * i`.
#[inline(always)]
const fn spread2(mask: u16) -> u32 {
    let mut m = mask as u32;
    m = (m & 0x0000_ff00) << 8 | (m & 0x0000_00ff);
    m = (m & 0x00f0_00f0) << 4 | (m & 0x000f_000f);
    m = (m & 0x0c0c_0c0c) << 2 | (m & 0x0303_0303);
    m = (m & 0x2222_2222) << 1 | (m & 0x1111_1111);
    m
}

/// Spreads an 8-bit pin mask so that pin `i` lands on bit `4 * i`.
#[inline(always)]
const fn spread4(mask: u8) -> u32 {
    let mut m = mask as u32;
    m = (m & 0x0000_00f0) << 12 | (m & 0x0000_000f);
    m = (m & 0x000c_000c) << 6 | (m & 0x0003_0003);
    m = (m & 0x0202_0202) << 3 | (m & 0x0101_0101);
    m
}

/// Writes the 2-bit `code` into the field of every pin selected by `mask`.
///
/// Fields of unselected pins are copied from `current` unchanged.
#[inline]
pub const fn pack_field2(mask: u16, current: u32, code: u32) -> u32 {
    let lanes = spread2(mask);
    (current & !(lanes * 0b11)) | lanes * (code & 0b11)
}

/// Writes the 4-bit `code` into the field of every pin selected by `mask`.
///
/// Covers eight pins, i.e. one alternate function half register.
#[inline]
pub const fn pack_field4(mask: u8, current: u32, code: u32) -> u32 {
    let lanes = spread4(mask);
    (current & !(lanes * 0b1111)) | lanes * (code & 0b1111)
}

/// Writes the 1-bit `code` into the bit of every pin selected by `mask`.
#[inline]
pub const fn pack_field1(mask: u16, current: u32, code: u32) -> u32 {
    let lanes = mask as u32;
    (current & !lanes) | lanes * (code & 0b1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGS: [u32; 5] = [0, 0xffff_ffff, 0xa5a5_a5a5, 0x1234_5678, 0x8000_0001];

    /// Reference implementation: one pin at a time.
    fn naive(mask: u32, pins: u32, width: u32, current: u32, code: u32) -> u32 {
        let field = (1 << width) - 1;
        (0..pins)
            .filter(|pin| mask & (1 << pin) != 0)
            .fold(current, |acc, pin| {
                let shift = pin * width;
                (acc & !(field << shift)) | ((code & field) << shift)
            })
    }

    #[test]
    fn spread_places_each_pin_on_its_lane() {
        for pin in 0..16 {
            assert_eq!(spread2(1 << pin), 1 << (2 * pin));
        }
        for pin in 0..8 {
            assert_eq!(spread4(1 << pin), 1 << (4 * pin));
        }
        assert_eq!(spread2(0xffff), 0x5555_5555);
        assert_eq!(spread4(0xff), 0x1111_1111);
    }

    #[test]
    fn field2_matches_per_pin_loop() {
        for &current in &REGS {
            for code in 0..4 {
                for mask in 0..=u16::MAX {
                    assert_eq!(
                        pack_field2(mask, current, code),
                        naive(mask.into(), 16, 2, current, code),
                        "mask {:#06x} current {:#010x} code {}",
                        mask,
                        current,
                        code
                    );
                }
            }
        }
    }

    #[test]
    fn field4_matches_per_pin_loop() {
        for &current in &REGS {
            for code in 0..16 {
                for mask in 0..=u8::MAX {
                    assert_eq!(
                        pack_field4(mask, current, code),
                        naive(mask.into(), 8, 4, current, code)
                    );
                }
            }
        }
    }

    #[test]
    fn field2_leaves_unselected_fields_alone() {
        for &current in &REGS {
            for mask in 0..=u16::MAX {
                let selected = spread2(mask) * 0b11;
                let packed = pack_field2(mask, current, 0b10);
                assert_eq!((packed ^ current) & !selected, 0);
            }
        }
    }

    #[test]
    fn field2_is_idempotent() {
        for &current in &REGS {
            for code in 0..4 {
                for mask in 0..=u16::MAX {
                    let once = pack_field2(mask, current, code);
                    assert_eq!(pack_field2(mask, once, code), once);
                }
            }
        }
    }

    #[test]
    fn empty_mask_is_noop() {
        for &current in &REGS {
            for code in 0..16 {
                assert_eq!(pack_field2(0, current, code), current);
                assert_eq!(pack_field4(0, current, code), current);
                assert_eq!(pack_field1(0, current, code), current);
            }
        }
    }

    #[test]
    fn full_mask_broadcasts_code() {
        for &current in &REGS {
            assert_eq!(pack_field2(0xffff, current, 0), 0x0000_0000);
            assert_eq!(pack_field2(0xffff, current, 1), 0x5555_5555);
            assert_eq!(pack_field2(0xffff, current, 2), 0xaaaa_aaaa);
            assert_eq!(pack_field2(0xffff, current, 3), 0xffff_ffff);
            assert_eq!(pack_field4(0xff, current, 7), 0x7777_7777);
        }
    }

    #[test]
    fn oversized_code_is_truncated_to_field() {
        assert_eq!(pack_field2(0x0002, 0, 0b111), 0b1100);
        assert_eq!(pack_field4(0x01, 0xffff_fff0, 0x1f), 0xffff_ffff);
        assert_eq!(pack_field4(0x01, 0, 0x10), 0);
        assert_eq!(pack_field1(0x0004, 0, 0b10), 0);
    }

    #[test]
    fn field1_sets_and_clears_bits() {
        assert_eq!(pack_field1(0x00f0, 0x0000_0f0f, 1), 0x0000_0fff);
        assert_eq!(pack_field1(0x00f0, 0x0000_0fff, 0), 0x0000_0f0f);
        // Bits above the pin range are never touched.
        assert_eq!(pack_field1(0xffff, 0xffff_0000, 0), 0xffff_0000);
    }

    #[test]
    fn mode_register_scenario() {
        assert_eq!(pack_field2(0x0003, 0, 1), 0x0000_0005);
    }
}
