// SPDX-License-Identifier: Apache-2.0

// Base-10 conversion for integer literals and length prefixes. The tokenizers
// strip the sign and enforce canonical form (digits only, no leading zeros,
// no `-0`, never empty) before these run, so overflow is the one failure left.

/// The value does not fit in the target type.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Overflow;

/// Creates a panic-free, const-stable, base-10 converter for a signed integer type.
macro_rules! define_signed_parser {
    ($fn_name:ident, $int_ty:ty) => {
        /// Converts a run of ASCII digits into a(n) `
        #[doc = stringify!($int_ty)]
        /// `, negated when `negative` is set.
        ///
        /// Every byte of `digits` must be `0..=9`.
        pub const fn $fn_name(negative: bool, digits: &[u8]) -> Result<$int_ty, Overflow> {
            let mut digits = digits;
            let mut result: $int_ty = 0;

            while let Some((&byte, rest)) = digits.split_first() {
                debug_assert!(byte.is_ascii_digit());
                let digit = byte.wrapping_sub(b'0') as $int_ty;

                result = match result.checked_mul(10) {
                    Some(val) => val,
                    None => return Err(Overflow),
                };

                // Accumulating negatively keeps MIN representable.
                let next = if negative {
                    result.checked_sub(digit)
                } else {
                    result.checked_add(digit)
                };
                result = match next {
                    Some(val) => val,
                    None => return Err(Overflow),
                };

                digits = rest;
            }

            Ok(result)
        }
    };
}

#[cfg(feature = "int32")]
define_signed_parser!(from_digits_i32, i32);
#[cfg(feature = "int64")]
define_signed_parser!(from_digits_i64, i64);

/// Converts the digits of an `i...e` literal into the configured [`Integer`](crate::Integer).
pub const fn parse_integer(negative: bool, digits: &[u8]) -> Result<crate::Integer, Overflow> {
    #[cfg(feature = "int32")]
    let result = from_digits_i32(negative, digits);
    #[cfg(feature = "int64")]
    let result = from_digits_i64(negative, digits);
    result
}

/// Converts the digits of a string length prefix.
pub const fn parse_length(digits: &[u8]) -> Result<usize, Overflow> {
    let mut digits = digits;
    let mut result: usize = 0;
    while let Some((&byte, rest)) = digits.split_first() {
        debug_assert!(byte.is_ascii_digit());
        result = match result.checked_mul(10) {
            Some(val) => val,
            None => return Err(Overflow),
        };
        result = match result.checked_add(byte.wrapping_sub(b'0') as usize) {
            Some(val) => val,
            None => return Err(Overflow),
        };
        digits = rest;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "int32")]
    mod test_i32 {
        use super::*;

        #[test]
        fn test_from_digits_i32_limits() {
            assert_eq!(from_digits_i32(false, b"2147483647"), Ok(i32::MAX));
            assert_eq!(from_digits_i32(true, b"2147483648"), Ok(i32::MIN));
            assert_eq!(from_digits_i32(false, b"2147483648"), Err(Overflow));
            assert_eq!(from_digits_i32(true, b"2147483649"), Err(Overflow));
        }
    }

    #[cfg(feature = "int64")]
    mod test_i64 {
        use super::*;

        #[test]
        fn test_from_digits_i64_simple() {
            assert_eq!(from_digits_i64(false, b"0"), Ok(0));
            assert_eq!(from_digits_i64(false, b"1234567890"), Ok(1234567890));
            assert_eq!(from_digits_i64(true, b"1234567890"), Ok(-1234567890));
        }

        #[test]
        fn test_from_digits_i64_limits() {
            assert_eq!(
                from_digits_i64(false, b"9223372036854775807"),
                Ok(i64::MAX)
            );
            assert_eq!(
                from_digits_i64(true, b"9223372036854775808"),
                Ok(i64::MIN)
            );
        }

        #[test]
        fn test_from_digits_i64_overflow() {
            assert_eq!(
                from_digits_i64(false, b"9223372036854775808"),
                Err(Overflow)
            );
            assert_eq!(
                from_digits_i64(true, b"9223372036854775809"),
                Err(Overflow)
            );
        }
    }

    #[test]
    fn test_parse_integer_sign() {
        assert_eq!(parse_integer(false, b"17"), Ok(17));
        assert_eq!(parse_integer(true, b"17"), Ok(-17));
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length(b"0"), Ok(0));
        assert_eq!(parse_length(b"4096"), Ok(4096));
        assert_eq!(
            parse_length(usize::MAX.to_string().as_bytes()),
            Ok(usize::MAX)
        );
        assert_eq!(parse_length(b"99999999999999999999999999"), Err(Overflow));
    }
}
