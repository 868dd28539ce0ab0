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

use std::fmt;

use crate::arith;
use crate::codec;
use crate::conv;
use crate::decimal::{Decimal, MAX_DIGITS};
use crate::error::ParseDecimalError;
use crate::round;

/// A context for performing decimal operations.
///
/// Contexts serve two purposes:
///
///   * They configure various properties of decimal arithmetic, like the
///     rounding algorithm to use.
///
///   * They accumulate any informational and exceptional conditions raised by
///     decimal operations. Multiple operations can be performed on a context
///     and the status need only be checked once at the end. This can improve
///     performance when performing many decimal operations.
///
/// Operations write a best-effort result into their output even when they
/// raise a condition; callers decide which conditions are fatal.
#[derive(Clone)]
pub struct Context {
    rounding: Rounding,
    status: Status,
}

impl Default for Context {
    fn default() -> Context {
        Context {
            rounding: Rounding::default(),
            status: Status::default(),
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("rounding", &self.rounding)
            .field("status", &self.status)
            .finish()
    }
}

impl Context {
    /// Returns the context's rounding algorithm.
    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Set's the context's rounding algorithm.
    pub fn set_rounding(&mut self, rounding: Rounding) {
        self.rounding = rounding;
    }

    /// Returns the context's status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Adds the given status to `self`.
    pub fn add_status(&mut self, status: Status) {
        self.status.inner |= status.inner;
    }

    /// Clears the context's status.
    pub fn clear_status(&mut self) {
        self.status.inner = 0;
    }

    /// Parses a number from its string representation.
    ///
    /// The syntax accepted is an optional sign, integer digits, an optional
    /// fraction introduced by `.`, and an optional exponent introduced by
    /// `e` or `E`; the exponent is folded into the digit positions, so the
    /// parsed number never retains an exponent. A stray trailing `.` is
    /// tolerated. Inputs whose digits exceed the storage capacity raise
    /// [`Status::overflow`] and saturate.
    pub fn parse<S>(&mut self, s: S) -> Result<Decimal, ParseDecimalError>
    where
        S: AsRef<[u8]>,
    {
        let (d, status) = codec::parse(s.as_ref());
        self.add_status(status);
        if status.conversion_syntax() {
            Err(ParseDecimalError)
        } else {
            Ok(d)
        }
    }

    /// Adds `lhs` and `rhs`, storing the result in `out`.
    ///
    /// An integer overflow saturates `out` to the largest representable
    /// magnitude and raises [`Status::overflow`].
    pub fn add(&mut self, lhs: &Decimal, rhs: &Decimal, out: &mut Decimal) {
        let (d, status) = arith::add(lhs, rhs);
        self.add_status(status);
        *out = d;
    }

    /// Subtracts `rhs` from `lhs`, storing the result in `out`.
    pub fn sub(&mut self, lhs: &Decimal, rhs: &Decimal, out: &mut Decimal) {
        let (d, status) = arith::sub(lhs, rhs);
        self.add_status(status);
        *out = d;
    }

    /// Multiplies `lhs` by `rhs`, storing the result in `out`.
    ///
    /// The result carries the sum of the operands' fractional widths.
    /// Fractional digits that do not fit in the representation are rounded
    /// away under the context's rounding algorithm; excess integer digits
    /// saturate and raise [`Status::overflow`].
    pub fn mul(&mut self, lhs: &Decimal, rhs: &Decimal, out: &mut Decimal) {
        let (d, status) = arith::mul(lhs, rhs, self.rounding);
        self.add_status(status);
        *out = d;
    }

    /// Divides `lhs` by `rhs`, storing the result in `out`.
    ///
    /// The quotient is computed with `frac_incr` fractional digits beyond
    /// the dividend's fractional width and then rounded to exactly that
    /// width under the context's rounding algorithm. Division by zero
    /// raises [`Status::division_by_zero`] and leaves `out` untouched.
    pub fn div(&mut self, lhs: &Decimal, rhs: &Decimal, out: &mut Decimal, frac_incr: usize) {
        let mut q = Decimal::ZERO;
        let status = arith::div_mod(lhs, rhs, Some(&mut q), None, frac_incr);
        self.add_status(status);
        if status.division_by_zero() {
            return;
        }
        let scale = (lhs.frac_digits() + frac_incr).min(MAX_DIGITS) as i32;
        let (d, status) = round::round(&q, scale, self.rounding);
        self.add_status(status);
        *out = d;
    }

    /// Integer-divides `lhs` by `rhs`, storing the remainder in `out`.
    ///
    /// The remainder takes the dividend's sign and the larger of the two
    /// fractional widths. Division by zero raises
    /// [`Status::division_by_zero`] and leaves `out` untouched.
    pub fn rem(&mut self, lhs: &Decimal, rhs: &Decimal, out: &mut Decimal) {
        let mut r = Decimal::ZERO;
        let status = arith::div_mod(lhs, rhs, None, Some(&mut r), 0);
        self.add_status(status);
        if status.division_by_zero() {
            return;
        }
        *out = r;
    }

    /// Rounds `n` at the decimal position `scale`, storing the result in
    /// `out`.
    ///
    /// A positive `scale` counts fractional digits to keep; zero rounds to
    /// an integer; a negative `scale` rounds to a multiple of
    /// 10<sup>-scale</sup>. A `scale` beyond the stored fractional width
    /// pads zeros up to the storage capacity.
    pub fn round(&mut self, n: &Decimal, scale: i32, out: &mut Decimal) {
        let (d, status) = round::round(n, scale, self.rounding);
        self.add_status(status);
        *out = d;
    }

    /// Converts `n` to an `i64`, truncating toward zero.
    ///
    /// Values outside the range of `i64` clamp to the nearest bound and
    /// raise [`Status::overflow`]. A non-zero discarded fraction raises
    /// [`Status::inexact`].
    pub fn to_i64(&mut self, n: &Decimal) -> i64 {
        let (v, status) = conv::to_i64(n);
        self.add_status(status);
        v
    }

    /// Converts `n` to a `u64`, truncating toward zero.
    ///
    /// Negative values clamp to zero and values above `u64::MAX` clamp to
    /// `u64::MAX`, raising [`Status::overflow`]. A non-zero discarded
    /// fraction raises [`Status::inexact`].
    pub fn to_u64(&mut self, n: &Decimal) -> u64 {
        let (v, status) = conv::to_u64(n);
        self.add_status(status);
        v
    }
}

/// Algorithms for rounding decimal numbers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Rounding {
    /// Round away from zero.
    ///
    /// Despite the name, negative numbers round away from zero as well,
    /// e.g. -15.1 rounds to -16 at scale 0.
    Ceiling,
    /// Round to nearest; if equidistant, round so that the final digit is even.
    HalfEven,
    /// Round towards zero (truncation).
    Truncate,
}

impl Default for Rounding {
    fn default() -> Rounding {
        Rounding::HalfEven
    }
}

const CONVERSION_SYNTAX: u32 = 1 << 0;
const DIVISION_BY_ZERO: u32 = 1 << 1;
const INEXACT: u32 = 1 << 2;
const OVERFLOW: u32 = 1 << 3;

/// Represents exceptional conditions resulting from operations on decimal
/// numbers.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Status {
    pub(crate) inner: u32,
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Status")
            .field("conversion_syntax", &self.conversion_syntax())
            .field("division_by_zero", &self.division_by_zero())
            .field("inexact", &self.inexact())
            .field("overflow", &self.overflow())
            .field("raw", &self.inner)
            .finish()
    }
}

impl Status {
    /// Reports whether any of the condition flags are set.
    pub fn any(&self) -> bool {
        self.inner != 0
    }

    /// Reports whether the conversion syntax flag is set.
    ///
    /// Operations set this flag when an invalid string is converted to a
    /// decimal.
    pub fn conversion_syntax(&self) -> bool {
        self.inner & CONVERSION_SYNTAX != 0
    }

    /// Sets `self`'s conversion syntax flag.
    pub fn set_conversion_syntax(&mut self) {
        self.inner |= CONVERSION_SYNTAX;
    }

    /// Reports whether the division by zero flag is set.
    ///
    /// Operations set this flag when a divisor or modulus is zero.
    pub fn division_by_zero(&self) -> bool {
        self.inner & DIVISION_BY_ZERO != 0
    }

    /// Sets `self`'s division by zero flag.
    pub fn set_division_by_zero(&mut self) {
        self.inner |= DIVISION_BY_ZERO;
    }

    /// Reports whether the inexact flag is set.
    ///
    /// Operations set this flag when one or more non-zero digits were
    /// discarded from a result.
    pub fn inexact(&self) -> bool {
        self.inner & INEXACT != 0
    }

    /// Sets `self`'s inexact flag.
    pub fn set_inexact(&mut self) {
        self.inner |= INEXACT;
    }

    /// Reports whether the overflow flag is set.
    ///
    /// Operations set this flag when the magnitude of a result is too large
    /// to be represented; the result saturates to the nearest bound.
    pub fn overflow(&self) -> bool {
        self.inner & OVERFLOW != 0
    }

    /// Sets `self`'s overflow flag.
    pub fn set_overflow(&mut self) {
        self.inner |= OVERFLOW;
    }
}

impl Default for Status {
    fn default() -> Self {
        Status { inner: 0 }
    }
}
