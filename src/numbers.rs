/// Implements sign extension as described at [Sign extension](https://en.wikipedia.org/wiki/Sign_extension).
///
/// Only the lowest `valid_bits` of `bits` are considered, the most significant of them is
/// treated as the two's complement sign bit.
#[must_use]
pub const fn sign_extend(bits: u16, valid_bits: u8) -> u16 {
    debug_assert!(valid_bits > 0 && valid_bits <= 16);
    if valid_bits == 16 {
        return bits;
    }
    let bits = bits & ((1 << valid_bits) - 1);
    if (bits >> (valid_bits - 1)) & 1 == 1 {
        // negative: 1-extend
        bits | (0xFFFF << valid_bits)
    } else {
        // positive, already 0-extended
        bits
    }
}

/// Interprets the bit pattern as a two's complement number.
#[must_use]
pub const fn twos_complement_to_decimal(bin_rep: u16) -> i16 {
    bin_rep.cast_signed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;
    use yare::parameterized;

    #[parameterized(
        imm5_positive = { 0b0_1110, 5, 14 },
        imm5_negative = { 0b1_1110, 5, -2 },
        imm5_min = { 0b1_0000, 5, -16 },
        offset6_min = { 0b10_0000, 6, -32 },
        offset6_max = { 0b01_1111, 6, 31 },
        offset9_negative = { 0b1_1011_1100, 9, -0x44 },
        offset9_max = { 0b0_1111_1111, 9, 255 },
        offset11_negative = { 0b111_1111_1111, 11, -1 },
        offset11_positive = { 0b001_1010_0001, 11, 0x1A1 },
        ignores_higher_bits = { 0b1111_0000_0000_0001, 5, 1 },
    )]
    fn test_sign_extend(bits: u16, valid_bits: u8, expected: i16) {
        assert_that!(
            twos_complement_to_decimal(sign_extend(bits, valid_bits)),
            eq(expected)
        );
    }

    #[parameterized(
        imm5 = { 5 },
        offset6 = { 6 },
        offset9 = { 9 },
        offset11 = { 11 },
    )]
    fn test_sign_extend_truncate_reproduces_field(valid_bits: u8) {
        let mask = (1u16 << valid_bits) - 1;
        for field in 0..=mask {
            let extended = sign_extend(field, valid_bits);
            assert_that!(extended & mask, eq(field));
            let value = i32::from(twos_complement_to_decimal(extended));
            let bound = 1i32 << (valid_bits - 1);
            assert_that!((-bound..bound).contains(&value), eq(true));
        }
    }

    #[gtest]
    pub fn test_twos_complement_to_decimal() {
        expect_that!(twos_complement_to_decimal(0x7FFF), eq(i16::MAX));
        expect_that!(twos_complement_to_decimal(0x8000), eq(i16::MIN));
        expect_that!(twos_complement_to_decimal(0xFFFF), eq(-1));
        expect_that!(twos_complement_to_decimal(0), eq(0));
    }
}
