// Copyright Materialize, Inc. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Conversions between decimals and native integer and float types.

use std::convert::TryFrom;

use crate::context::{Context, Status};
use crate::decimal::{digit_count, Decimal, LIMB_BASE, MAX_LIMBS};
use crate::error::{ParseDecimalError, TryFromDecimalError};

/// Builds a decimal from an unsigned magnitude and a sign.
fn from_u64_mag(mut mag: u64, neg: bool) -> Decimal {
    let mut rev = [0u32; 3];
    let mut n = 0;
    while mag > 0 {
        rev[n] = (mag % LIMB_BASE) as u32;
        mag /= LIMB_BASE;
        n += 1;
    }
    let mut limbs = [0u32; MAX_LIMBS];
    for i in 0..n {
        limbs[i] = rev[n - 1 - i];
    }
    let int_digits = if n == 0 {
        0
    } else {
        digit_count(limbs[0]) + 9 * (n - 1)
    };
    Decimal {
        neg: neg && n > 0,
        int_digits: int_digits as u8,
        frac_digits: 0,
        limbs,
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Decimal {
        from_u64_mag(n.unsigned_abs(), n < 0)
    }
}

impl From<u64> for Decimal {
    fn from(n: u64) -> Decimal {
        from_u64_mag(n, false)
    }
}

impl From<i32> for Decimal {
    fn from(n: i32) -> Decimal {
        Decimal::from(i64::from(n))
    }
}

impl From<u32> for Decimal {
    fn from(n: u32) -> Decimal {
        Decimal::from(u64::from(n))
    }
}

/// Accumulates the integer part of `d` as an unsigned magnitude, clamping
/// at `u64::MAX`.
fn int_mag(d: &Decimal) -> Option<u64> {
    let mut mag: u64 = 0;
    for &limb in &d.limbs[..d.int_limbs()] {
        mag = mag
            .checked_mul(LIMB_BASE)?
            .checked_add(u64::from(limb))?;
    }
    Some(mag)
}

/// Reports whether `d` has a non-zero fractional digit.
fn frac_nonzero(d: &Decimal) -> bool {
    let wi = d.int_limbs();
    d.limbs[wi..wi + d.frac_limbs()].iter().any(|&l| l != 0)
}

/// Converts to an `i64`, truncating toward zero and clamping out-of-range
/// values.
pub(crate) fn to_i64(d: &Decimal) -> (i64, Status) {
    let mut status = Status::default();
    let bound = 1u64 << 63;
    let v = match int_mag(d) {
        Some(mag) if d.neg && mag <= bound => (mag as i64).wrapping_neg(),
        Some(mag) if !d.neg && mag < bound => mag as i64,
        _ => {
            status.set_overflow();
            if d.neg {
                i64::MIN
            } else {
                i64::MAX
            }
        }
    };
    if !status.overflow() && frac_nonzero(d) {
        status.set_inexact();
    }
    (v, status)
}

/// Converts to a `u64`, truncating toward zero and clamping out-of-range
/// values.
pub(crate) fn to_u64(d: &Decimal) -> (u64, Status) {
    let mut status = Status::default();
    if d.neg {
        status.set_overflow();
        return (0, status);
    }
    let v = match int_mag(d) {
        Some(mag) => mag,
        None => {
            status.set_overflow();
            u64::MAX
        }
    };
    if !status.overflow() && frac_nonzero(d) {
        status.set_inexact();
    }
    (v, status)
}

impl TryFrom<Decimal> for i64 {
    type Error = TryFromDecimalError;

    fn try_from(d: Decimal) -> Result<i64, TryFromDecimalError> {
        let (v, status) = to_i64(&d);
        if status.any() {
            Err(TryFromDecimalError)
        } else {
            Ok(v)
        }
    }
}

impl TryFrom<Decimal> for u64 {
    type Error = TryFromDecimalError;

    fn try_from(d: Decimal) -> Result<u64, TryFromDecimalError> {
        let (v, status) = to_u64(&d);
        if status.any() {
            Err(TryFromDecimalError)
        } else {
            Ok(v)
        }
    }
}

impl TryFrom<f64> for Decimal {
    type Error = ParseDecimalError;

    /// Converts an `f64` through its shortest round-trip decimal form, so
    /// that converting the result back to an `f64` recovers `n` exactly.
    fn try_from(n: f64) -> Result<Decimal, ParseDecimalError> {
        if !n.is_finite() {
            return Err(ParseDecimalError);
        }
        let mut cx = Context::default();
        let d = cx.parse(format!("{:e}", n))?;
        if cx.status().any() {
            return Err(ParseDecimalError);
        }
        Ok(d)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use crate::{Context, Decimal};

    fn parse(s: &str) -> Decimal {
        Context::default().parse(s).unwrap()
    }

    #[test]
    fn test_from_int() {
        let tests: [(i64, &str); 5] = [
            (-12345, "-12345"),
            (-1, "-1"),
            (1, "1"),
            (-9223372036854775807, "-9223372036854775807"),
            (i64::MIN, "-9223372036854775808"),
        ];
        for (input, output) in tests {
            assert_eq!(Decimal::from(input).to_string(), output);
        }
    }

    #[test]
    fn test_from_uint() {
        let tests: [(u64, &str); 3] = [
            (12345, "12345"),
            (0, "0"),
            (18446744073709551615, "18446744073709551615"),
        ];
        for (input, output) in tests {
            assert_eq!(Decimal::from(input).to_string(), output);
        }
    }

    #[test]
    fn test_to_i64() {
        struct Case {
            input: &'static str,
            output: i64,
            overflow: bool,
            inexact: bool,
        }
        let tests = [
            Case {
                input: "18446744073709551615",
                output: i64::MAX,
                overflow: true,
                inexact: false,
            },
            Case {
                input: "-1",
                output: -1,
                overflow: false,
                inexact: false,
            },
            Case {
                input: "1",
                output: 1,
                overflow: false,
                inexact: false,
            },
            Case {
                input: "-1.23",
                output: -1,
                overflow: false,
                inexact: true,
            },
            Case {
                input: "-9223372036854775807",
                output: -9223372036854775807,
                overflow: false,
                inexact: false,
            },
            Case {
                input: "-9223372036854775808",
                output: i64::MIN,
                overflow: false,
                inexact: false,
            },
            Case {
                input: "9223372036854775808",
                output: i64::MAX,
                overflow: true,
                inexact: false,
            },
            Case {
                input: "-9223372036854775809",
                output: i64::MIN,
                overflow: true,
                inexact: false,
            },
        ];
        for t in tests {
            let mut cx = Context::default();
            let d = parse(t.input);
            assert_eq!(cx.to_i64(&d), t.output, "to_i64({})", t.input);
            assert_eq!(cx.status().overflow(), t.overflow, "to_i64({})", t.input);
            assert_eq!(cx.status().inexact(), t.inexact, "to_i64({})", t.input);
        }
    }

    #[test]
    fn test_to_u64() {
        struct Case {
            input: &'static str,
            output: u64,
            overflow: bool,
            inexact: bool,
        }
        let tests = [
            Case {
                input: "12345",
                output: 12345,
                overflow: false,
                inexact: false,
            },
            Case {
                input: "0",
                output: 0,
                overflow: false,
                inexact: false,
            },
            Case {
                input: "18446744073709551615",
                output: u64::MAX,
                overflow: false,
                inexact: false,
            },
            Case {
                input: "18446744073709551616",
                output: u64::MAX,
                overflow: true,
                inexact: false,
            },
            Case {
                input: "-1",
                output: 0,
                overflow: true,
                inexact: false,
            },
            Case {
                input: "1.23",
                output: 1,
                overflow: false,
                inexact: true,
            },
            Case {
                input: "9999999999999999999999999.000",
                output: u64::MAX,
                overflow: true,
                inexact: false,
            },
        ];
        for t in tests {
            let mut cx = Context::default();
            let d = parse(t.input);
            assert_eq!(cx.to_u64(&d), t.output, "to_u64({})", t.input);
            assert_eq!(cx.status().overflow(), t.overflow, "to_u64({})", t.input);
            assert_eq!(cx.status().inexact(), t.inexact, "to_u64({})", t.input);
        }
    }

    #[test]
    fn test_try_from_decimal() {
        assert_eq!(i64::try_from(parse("-42")), Ok(-42));
        assert!(i64::try_from(parse("1.5")).is_err());
        assert!(i64::try_from(parse("18446744073709551615")).is_err());
        assert_eq!(u64::try_from(parse("42")), Ok(42));
        assert!(u64::try_from(parse("-1")).is_err());
    }

    #[test]
    fn test_from_float() {
        let tests = [
            ("12345", 12345f64),
            ("123.45", 123.45),
            ("-123.45", -123.45),
            ("0.00012345000098765", 0.00012345000098765),
            ("1234500009876.5", 1234500009876.5),
        ];
        for (s, f) in tests {
            let d = Decimal::try_from(f).unwrap();
            assert_eq!(d.to_string(), s, "try_from({})", f);
        }
        assert!(Decimal::try_from(f64::NAN).is_err());
        assert!(Decimal::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn test_to_float() {
        let tests = [
            ("12345", 12345f64),
            ("123.45", 123.45),
            ("-123.45", -123.45),
            ("0.00012345000098765", 0.00012345000098765),
            ("1234500009876.5", 1234500009876.5),
        ];
        for (s, f) in tests {
            assert_eq!(parse(s).to_f64(), f, "to_f64({})", s);
        }
    }

    #[test]
    fn test_float_round_trip() {
        for f in [0.0, 1.0, -1.0, 0.1, 1.0 / 3.0, 1e-40, 12345.6789] {
            let d = Decimal::try_from(f).unwrap();
            assert_eq!(d.to_f64(), f, "round trip of {}", f);
        }
    }
}
