//! Conversions between raw 16-bit words and the two's complement values they encode.

pub fn twos_complement_to_decimal(bin_rep: u16) -> i16 {
    let is_negative = bin_rep >> 15 & 1 == 1;
    #[expect(
        clippy::cast_possible_wrap,
        reason = "Nature of 2's complement is that if leftmost bit is 0, then we cannot overflow"
    )]
    if is_negative {
        let negative_msb_value: i32 = -(1 << 15);
        let res_i32 = (i32::from(bin_rep) & (!(1 << 15))) + negative_msb_value;
        i16::try_from(res_i32).expect("overflow in two's complement conversion")
    } else {
        bin_rep as i16
    }
}

pub fn decimal_to_twos_complement(decimal: i16) -> u16 {
    if decimal >= 0 {
        decimal
            .try_into()
            .expect("decimal too large to fit into i16 when computing two's complement")
    } else {
        !decimal.unsigned_abs() + 1
    }
}

/// Implements sign extension as described at [Sign extension](https://en.wikipedia.org/wiki/Sign_extension).
///
/// `bits` carries a `valid_bits` wide two's complement value in its low bits;
/// the result carries the same value as a 16-bit two's complement word.
pub const fn sign_extend(bits: u16, valid_bits: u8) -> u16 {
    let most_significant_bit = bits >> (valid_bits - 1);
    if most_significant_bit == 1 {
        // negative: 1-extend
        bits | (0xFFFF << valid_bits)
    } else {
        // positive, already 0-extended
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[gtest]
    pub fn test_sign_extend_negative_imm5() {
        expect_that!(sign_extend(0b10000, 5), eq(0xFFF0));
        expect_that!(sign_extend(0b11110, 5), eq(0xFFFE));
    }
    #[gtest]
    pub fn test_sign_extend_positive_stays() {
        expect_that!(sign_extend(0b01111, 5), eq(0b01111));
        expect_that!(sign_extend(0, 9), eq(0));
    }
    #[gtest]
    pub fn test_sign_extend_matches_signed_interpretation() {
        // Every supported field width against the value -3 and the value +3.
        for width in [5u8, 6, 9, 11] {
            let mask = (1u16 << width) - 1;
            let encoded_neg = decimal_to_twos_complement(-3) & mask;
            expect_that!(
                twos_complement_to_decimal(sign_extend(encoded_neg, width)),
                eq(-3),
                "width {width}"
            );
            expect_that!(twos_complement_to_decimal(sign_extend(3 & mask, width)), eq(3));
        }
    }
    #[gtest]
    pub fn test_twos_complement_round_trip() {
        for value in [i16::MIN, -4711, -1, 0, 1, 815, i16::MAX] {
            expect_that!(
                twos_complement_to_decimal(decimal_to_twos_complement(value)),
                eq(value)
            );
        }
    }
}
