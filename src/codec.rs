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

//! Text to decimal conversion.
//!
//! The inverse direction lives in the `Display` implementation on
//! [`Decimal`].

use crate::context::Status;
use crate::decimal::{limbs_for, Decimal, LIMB_DIGITS, MAX_DIGITS, MAX_LIMBS, POW10};

/// Parses a decimal from its byte representation.
///
/// Returns a best-effort value and the conditions raised while producing
/// it. On a syntax error the value is zero and the conversion syntax flag
/// is set.
pub(crate) fn parse(b: &[u8]) -> (Decimal, Status) {
    let mut status = Status::default();
    let syntax = |mut status: Status| {
        status.set_conversion_syntax();
        (Decimal::ZERO, status)
    };

    let mut i = 0;
    while i < b.len() && b[i].is_ascii_whitespace() {
        i += 1;
    }
    let mut neg = false;
    match b.get(i) {
        Some(b'-') => {
            neg = true;
            i += 1;
        }
        Some(b'+') => i += 1,
        _ => {}
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let int_raw = &b[int_start..i];
    let mut frac_raw: &[u8] = &[];
    if b.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        frac_raw = &b[frac_start..i];
    }
    if int_raw.is_empty() && frac_raw.is_empty() {
        return syntax(status);
    }
    // A stray second dot after the fraction is consumed silently.
    if b.get(i) == Some(&b'.') {
        i += 1;
    }
    let mut exp: i64 = 0;
    if matches!(b.get(i), Some(b'e') | Some(b'E')) {
        i += 1;
        let mut exp_neg = false;
        match b.get(i) {
            Some(b'-') => {
                exp_neg = true;
                i += 1;
            }
            Some(b'+') => i += 1,
            _ => {}
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            // Saturate well past any representable position; the digit
            // accounting below turns an absurd exponent into overflow or
            // a vanished fraction.
            exp = (exp * 10 + i64::from(b[i] - b'0')).min(1 << 40);
            i += 1;
        }
        if i == exp_start {
            return syntax(status);
        }
        if exp_neg {
            exp = -exp;
        }
    }
    while i < b.len() && b[i].is_ascii_whitespace() {
        i += 1;
    }
    if i != b.len() {
        return syntax(status);
    }

    // Leading integer zeros carry no information; written fractional digits
    // (trailing zeros included) all do.
    let int_sig = &int_raw[int_raw.iter().take_while(|&&c| c == b'0').count()..];
    let len = int_sig.len() + frac_raw.len();
    let digit = |i: usize| -> u32 {
        if i < int_sig.len() {
            u32::from(int_sig[i] - b'0')
        } else {
            u32::from(frac_raw[i - int_sig.len()] - b'0')
        }
    };
    let point = int_sig.len() as i64 + exp;

    let first_sig = (0..len).find(|&i| digit(i) != 0);
    let first_sig = match first_sig {
        Some(fs) => fs,
        None => {
            // A written zero; the fractional width survives the exponent
            // shift.
            let frac = (len as i64 - point).clamp(0, MAX_DIGITS as i64) as usize;
            let mut d = Decimal::ZERO;
            d.frac_digits = frac as u8;
            return (d, status);
        }
    };

    let int_count = point - first_sig as i64;
    if int_count > MAX_DIGITS as i64 {
        status.set_overflow();
        return (Decimal::saturated(neg), status);
    }
    let int_count = int_count.max(0) as usize;
    let wi = limbs_for(int_count);
    let frac_total = (len as i64 - point).max(0) as usize;
    let frac_count = frac_total.min((MAX_LIMBS - wi) * LIMB_DIGITS);
    if frac_count < frac_total {
        status.set_overflow();
        let drop_start = (point + frac_count as i64).max(0) as usize;
        if (drop_start..len).any(|i| digit(i) != 0) {
            status.set_inexact();
        }
    }

    let mut limbs = [0u32; MAX_LIMBS];
    // Integer digits pack right-aligned against the decimal point.
    let int_digit = |i: usize| {
        let idx = first_sig + i;
        if idx < len && (idx as i64) < point {
            digit(idx)
        } else {
            0
        }
    };
    let mut li = wi;
    let mut acc = 0u32;
    let mut k = 0;
    for r in 0..int_count {
        acc += int_digit(int_count - 1 - r) * POW10[k];
        k += 1;
        if k == LIMB_DIGITS {
            li -= 1;
            limbs[li] = acc;
            acc = 0;
            k = 0;
        }
    }
    if k > 0 {
        li -= 1;
        limbs[li] = acc;
    }
    // Fractional digits pack left-aligned against the decimal point.
    for j in 0..frac_count {
        let idx = point + j as i64;
        let d = if idx < 0 { 0 } else { digit(idx as usize) };
        limbs[wi + j / LIMB_DIGITS] += d * POW10[LIMB_DIGITS - 1 - j % LIMB_DIGITS];
    }

    let zero = limbs.iter().all(|&l| l == 0);
    let d = Decimal {
        neg: neg && !zero,
        int_digits: int_count as u8,
        frac_digits: frac_count as u8,
        limbs,
    };
    (d, status)
}

#[cfg(test)]
mod tests {
    use crate::{Context, Decimal};

    fn parse(s: &str) -> Decimal {
        Context::default().parse(s).unwrap()
    }

    #[test]
    fn test_from_string() {
        let tests = [
            ("12345", "12345"),
            ("12345.", "12345"),
            ("123.45.", "123.45"),
            ("-123.45.", "-123.45"),
            (".00012345000098765", "0.00012345000098765"),
            (".12345000098765", "0.12345000098765"),
            ("-.000000012345000098765", "-0.000000012345000098765"),
            ("1234500009876.5", "1234500009876.5"),
            ("123E5", "12300000"),
            ("123E-2", "1.23"),
        ];
        for (input, output) in tests {
            assert_eq!(parse(input).to_string(), output, "parse({:?})", input);
        }
    }

    #[test]
    fn test_to_string() {
        let tests = [
            ("123.123", "123.123"),
            ("123.1230", "123.1230"),
            ("00123.123", "123.123"),
        ];
        for (input, output) in tests {
            assert_eq!(parse(input).to_string(), output, "parse({:?})", input);
        }
    }

    #[test]
    fn test_exponent_shifts() {
        let tests = [
            ("1e9", "1000000000"),
            ("0.00012345e8", "12345"),
            ("0.0001e2", "0.01"),
            ("100E-2", "1.00"),
            ("5e-1", "0.5"),
            ("1.5E4", "15000"),
            ("0.000e2", "0.0"),
        ];
        for (input, output) in tests {
            assert_eq!(parse(input).to_string(), output, "parse({:?})", input);
        }
    }

    #[test]
    fn test_syntax_errors() {
        for input in ["", ".", "+", "-", "e10", "1e", "1e+", "12a", "1.2.3", "--1"] {
            let mut cx = Context::default();
            assert!(cx.parse(input).is_err(), "parse({:?})", input);
            assert!(cx.status().conversion_syntax());
        }
    }

    #[test]
    fn test_whitespace_and_signs() {
        assert_eq!(parse("  12.5 ").to_string(), "12.5");
        assert_eq!(parse("+12.5").to_string(), "12.5");
        assert_eq!(parse("-0").to_string(), "0");
        assert_eq!(parse("-0.00").to_string(), "0.00");
        assert!(!parse("-0.00").is_negative());
    }

    #[test]
    fn test_capacity() {
        // 81 digits fit exactly.
        let nines = "9".repeat(81);
        let mut cx = Context::default();
        let d = cx.parse(&nines).unwrap();
        assert!(!cx.status().any());
        assert_eq!(d.to_string(), nines);

        // An 82-digit integer saturates.
        let mut cx = Context::default();
        let d = cx.parse(format!("1{}", "0".repeat(81))).unwrap();
        assert!(cx.status().overflow());
        assert_eq!(d.to_string(), nines);

        // Excess fractional digits are cut to what fits.
        let mut cx = Context::default();
        let d = cx.parse(format!("1.{}", "9".repeat(100))).unwrap();
        assert!(cx.status().overflow());
        assert!(cx.status().inexact());
        assert_eq!(d.to_string(), format!("1.{}", "9".repeat(72)));
    }

    #[test]
    fn test_parse_format_canonical() {
        // Formatting a parsed value normalises the text: no exponent, no
        // stray dot, a leading zero for bare fractions, no leading integer
        // zeros.
        let tests = [
            ("12345.", "12345"),
            (".5", "0.5"),
            ("0012.30", "12.30"),
            ("1E2", "100"),
            ("-.5", "-0.5"),
        ];
        for (input, output) in tests {
            assert_eq!(parse(input).to_string(), output, "parse({:?})", input);
        }
    }
}
