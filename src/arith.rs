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

//! The arithmetic kernels: compare, add, subtract, multiply, divide and
//! modulus.
//!
//! All kernels work on magnitudes and reapply signs at the end, staging
//! results in local buffers so outputs may alias inputs.

use std::cmp::Ordering;

use crate::context::{Rounding, Status};
use crate::decimal::{
    digit_count, limbs_for, Decimal, LIMB_BASE, LIMB_DIGITS, MAX_LIMBS, POW10,
};

/// Compares two decimals.
///
/// The order is total: negative sorts before positive, and among one sign
/// magnitudes compare by integer digit count and then limb by limb.
pub(crate) fn cmp(a: &Decimal, b: &Decimal) -> Ordering {
    match (a.is_zero(), b.is_zero()) {
        (true, true) => Ordering::Equal,
        (true, false) => {
            if b.neg {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (false, true) => {
            if a.neg {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        (false, false) => {
            if a.neg != b.neg {
                if a.neg {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            } else if a.neg {
                cmp_mag(a, b).reverse()
            } else {
                cmp_mag(a, b)
            }
        }
    }
}

/// Compares two magnitudes, ignoring signs.
fn cmp_mag(a: &Decimal, b: &Decimal) -> Ordering {
    let ord = a.int_digits.cmp(&b.int_digits);
    if ord != Ordering::Equal {
        return ord;
    }
    let wi = a.int_limbs();
    for i in 0..wi {
        let ord = a.limbs[i].cmp(&b.limbs[i]);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    let wfa = a.frac_limbs();
    let wfb = b.frac_limbs();
    for j in 0..wfa.max(wfb) {
        let av = if j < wfa { a.limbs[wi + j] } else { 0 };
        let bv = if j < wfb { b.limbs[wi + j] } else { 0 };
        let ord = av.cmp(&bv);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// The limb of `d`'s fraction at offset `j` below the point, or zero.
fn frac_limb(d: &Decimal, j: usize) -> u64 {
    if j < d.frac_limbs() {
        u64::from(d.limbs[d.int_limbs() + j])
    } else {
        0
    }
}

/// The limb of `d`'s integer part at offset `k` above the point, or zero.
fn int_limb(d: &Decimal, k: usize) -> u64 {
    let wi = d.int_limbs();
    if k < wi {
        u64::from(d.limbs[wi - 1 - k])
    } else {
        0
    }
}

/// Adds two decimals.
pub(crate) fn add(a: &Decimal, b: &Decimal) -> (Decimal, Status) {
    if a.neg == b.neg {
        let (mut d, status) = add_mag(a, b);
        d.neg = a.neg && !d.is_zero();
        (d, status)
    } else {
        let (mut d, swapped, status) = sub_mag(a, b);
        let neg = if swapped { b.neg } else { a.neg };
        d.neg = neg && !d.is_zero();
        (d, status)
    }
}

/// Subtracts `b` from `a`.
pub(crate) fn sub(a: &Decimal, b: &Decimal) -> (Decimal, Status) {
    if a.neg != b.neg {
        let (mut d, status) = add_mag(a, b);
        d.neg = a.neg && !d.is_zero();
        (d, status)
    } else {
        let (mut d, swapped, status) = sub_mag(a, b);
        let neg = if swapped { !b.neg } else { a.neg };
        d.neg = neg && !d.is_zero();
        (d, status)
    }
}

/// Adds two magnitudes, aligned at the decimal point.
fn add_mag(a: &Decimal, b: &Decimal) -> (Decimal, Status) {
    let mut status = Status::default();
    if a.is_zero() || b.is_zero() {
        // The zero operand still contributes its fractional width.
        let (z, nz) = if a.is_zero() { (a, b) } else { (b, a) };
        let frac = z
            .frac_digits()
            .max(nz.frac_digits())
            .min((MAX_LIMBS - nz.int_limbs()) * LIMB_DIGITS);
        let mut out = *nz;
        out.neg = false;
        out.frac_digits = frac as u8;
        return (out, status);
    }
    let wia = a.int_limbs();
    let wib = b.int_limbs();
    let wfa = a.frac_limbs();
    let wfb = b.frac_limbs();
    let wi = wia.max(wib);
    let mut wf = wfa.max(wfb);
    // Whether the sum can spill into a fresh leading limb is decided from
    // the top limbs alone, as in the original; the check may reserve a limb
    // that stays zero.
    let top = if wia > wib {
        u64::from(a.limbs[0])
    } else if wib > wia {
        u64::from(b.limbs[0])
    } else {
        // Equal widths, so the leading limbs align; with no integer limbs
        // at all these are the leading fractional limbs, whose sum decides
        // whether the carry crosses the decimal point.
        u64::from(a.limbs[0]) + u64::from(b.limbs[0])
    };
    let wi_out = wi + usize::from(top >= LIMB_BASE - 1);
    if wi_out > MAX_LIMBS {
        status.set_overflow();
        return (Decimal::saturated(false), status);
    }
    let mut frac_digits = a.frac_digits().max(b.frac_digits());
    if wi_out + wf > MAX_LIMBS {
        let keep = MAX_LIMBS - wi_out;
        if (keep..wfa).any(|j| a.limbs[wia + j] != 0)
            || (keep..wfb).any(|j| b.limbs[wib + j] != 0)
        {
            status.set_inexact();
        }
        wf = keep;
        frac_digits = frac_digits.min(wf * LIMB_DIGITS);
    }
    let mut limbs = [0u32; MAX_LIMBS];
    let mut carry = 0u64;
    for j in (0..wf).rev() {
        let s = frac_limb(a, j) + frac_limb(b, j) + carry;
        limbs[wi_out + j] = (s % LIMB_BASE) as u32;
        carry = s / LIMB_BASE;
    }
    for k in 0..wi {
        let s = int_limb(a, k) + int_limb(b, k) + carry;
        limbs[wi_out - 1 - k] = (s % LIMB_BASE) as u32;
        carry = s / LIMB_BASE;
    }
    if carry > 0 {
        limbs[0] = carry as u32;
    }
    (
        Decimal::from_parts(false, &limbs[..wi_out], &limbs[wi_out..wi_out + wf], frac_digits),
        status,
    )
}

/// Subtracts the smaller magnitude from the larger, aligned at the decimal
/// point. Reports whether the operands were swapped.
fn sub_mag(a: &Decimal, b: &Decimal) -> (Decimal, bool, Status) {
    let mut status = Status::default();
    let (big, small, swapped) = match cmp_mag(a, b) {
        Ordering::Equal => return (Decimal::ZERO, false, status),
        Ordering::Less => (b, a, true),
        Ordering::Greater => (a, b, false),
    };
    let wi = big.int_limbs();
    let wfb = big.frac_limbs();
    let wfs = small.frac_limbs();
    let mut wf = wfb.max(wfs);
    let mut frac_digits = big.frac_digits().max(small.frac_digits());
    if wi + wf > MAX_LIMBS {
        let keep = MAX_LIMBS - wi;
        if (keep..wfb).any(|j| big.limbs[wi + j] != 0)
            || (keep..wfs).any(|j| small.limbs[small.int_limbs() + j] != 0)
        {
            status.set_inexact();
        }
        wf = keep;
        frac_digits = frac_digits.min(wf * LIMB_DIGITS);
    }
    let mut limbs = [0u32; MAX_LIMBS];
    let mut borrow = 0i64;
    for j in (0..wf).rev() {
        let t = frac_limb(big, j) as i64 - frac_limb(small, j) as i64 - borrow;
        if t < 0 {
            limbs[wi + j] = (t + LIMB_BASE as i64) as u32;
            borrow = 1;
        } else {
            limbs[wi + j] = t as u32;
            borrow = 0;
        }
    }
    for k in 0..wi {
        let t = int_limb(big, k) as i64 - int_limb(small, k) as i64 - borrow;
        if t < 0 {
            limbs[wi - 1 - k] = (t + LIMB_BASE as i64) as u32;
            borrow = 1;
        } else {
            limbs[wi - 1 - k] = t as u32;
            borrow = 0;
        }
    }
    debug_assert!(borrow == 0);
    (
        Decimal::from_parts(false, &limbs[..wi], &limbs[wi..wi + wf], frac_digits),
        swapped,
        status,
    )
}

/// Multiplies two decimals.
///
/// The fractional widths add; fractional digits beyond the storage capacity
/// are rounded away under `mode`, excess integer digits saturate.
pub(crate) fn mul(a: &Decimal, b: &Decimal, mode: Rounding) -> (Decimal, Status) {
    let mut status = Status::default();
    if a.is_zero() || b.is_zero() {
        return (Decimal::ZERO, status);
    }
    let neg = a.neg != b.neg;
    let wia = a.int_limbs();
    let wib = b.int_limbs();
    let wa = wia + a.frac_limbs();
    let wb = wib + b.frac_limbs();
    let mut prod = [0u32; 3 * MAX_LIMBS];
    let plen = mul_limbs(&a.limbs[..wa], &b.limbs[..wb], &mut prod);
    let wi_raw = wia + wib;
    let frac_raw = a.frac_digits() + b.frac_digits();

    let mut lead = prod[..wi_raw].iter().take_while(|&&l| l == 0).count();
    let mut li = wi_raw - lead;
    if li > MAX_LIMBS {
        status.set_overflow();
        return (Decimal::saturated(neg), status);
    }
    let mut frac_digits = frac_raw;
    if frac_digits > (MAX_LIMBS - li) * LIMB_DIGITS {
        frac_digits = (MAX_LIMBS - li) * LIMB_DIGITS;
        if round_at(&mut prod[..plen], wi_raw, frac_digits, mode) {
            status.set_inexact();
        }
        // A carry out of the fraction can lengthen the integer part; the
        // fraction is all zeros then, so it only needs to shrink to fit.
        lead = prod[..wi_raw].iter().take_while(|&&l| l == 0).count();
        li = wi_raw - lead;
        if li > MAX_LIMBS {
            status.set_overflow();
            return (Decimal::saturated(neg), status);
        }
        frac_digits = frac_digits.min((MAX_LIMBS - li) * LIMB_DIGITS);
    }
    let wf = limbs_for(frac_digits);
    (
        Decimal::from_parts(neg, &prod[..wi_raw], &prod[wi_raw..wi_raw + wf], frac_digits),
        status,
    )
}

/// Multiplies two big-endian limb integers into `out`, returning the
/// product's limb count (`x.len() + y.len()`, possibly with a zero leading
/// limb).
fn mul_limbs(x: &[u32], y: &[u32], out: &mut [u32]) -> usize {
    let len = x.len() + y.len();
    let mut acc = [0u64; 4 * MAX_LIMBS];
    for (i, &xi) in x.iter().enumerate() {
        for (j, &yj) in y.iter().enumerate() {
            acc[i + j + 1] += u64::from(xi) * u64::from(yj);
        }
    }
    let mut carry = 0u64;
    for k in (0..len).rev() {
        let t = acc[k] + carry;
        out[k] = (t % LIMB_BASE) as u32;
        carry = t / LIMB_BASE;
    }
    debug_assert!(carry == 0);
    len
}

/// Rounds the magnitude in `limbs` (of which the first `int_limbs` hold the
/// integer part) to `scale` fractional digits, in place. Returns whether a
/// non-zero digit was discarded.
fn round_at(limbs: &mut [u32], int_limbs: usize, scale: usize, mode: Rounding) -> bool {
    let digit = |limbs: &[u32], slot: usize| -> u32 {
        (limbs[slot / LIMB_DIGITS] / POW10[LIMB_DIGITS - 1 - slot % LIMB_DIGITS]) % 10
    };
    let total = limbs.len() * LIMB_DIGITS;
    let cut = int_limbs * LIMB_DIGITS + scale;
    debug_assert!(cut < total);
    let first_dropped = digit(limbs, cut);
    let rest_dropped = {
        let li = cut / LIMB_DIGITS;
        limbs[li] % POW10[LIMB_DIGITS - 1 - cut % LIMB_DIGITS] != 0
            || limbs[li + 1..].iter().any(|&l| l != 0)
    };
    let kept = if cut >= 1 { digit(limbs, cut - 1) } else { 0 };
    let up = match mode {
        Rounding::Truncate => false,
        Rounding::Ceiling => first_dropped != 0 || rest_dropped,
        Rounding::HalfEven => {
            first_dropped > 5 || (first_dropped == 5 && (rest_dropped || kept % 2 == 1))
        }
    };
    let inexact = first_dropped != 0 || rest_dropped;
    let keep_limbs = (cut + LIMB_DIGITS - 1) / LIMB_DIGITS;
    for l in &mut limbs[keep_limbs..] {
        *l = 0;
    }
    if cut % LIMB_DIGITS != 0 {
        let l = &mut limbs[keep_limbs - 1];
        *l -= *l % POW10[LIMB_DIGITS - cut % LIMB_DIGITS];
    }
    if up {
        let unit_slot = cut - 1;
        let mut idx = unit_slot / LIMB_DIGITS;
        let mut carry = u64::from(POW10[LIMB_DIGITS - 1 - unit_slot % LIMB_DIGITS]);
        loop {
            let t = u64::from(limbs[idx]) + carry;
            limbs[idx] = (t % LIMB_BASE) as u32;
            carry = t / LIMB_BASE;
            if carry == 0 || idx == 0 {
                break;
            }
            idx -= 1;
        }
        debug_assert!(carry == 0);
    }
    inexact
}

/// Divides `a` by `b`, producing a quotient, a remainder, or both.
///
/// The quotient carries `frac_incr` fractional digits beyond the dividend's
/// fractional width, widened to whole limbs during the computation. The
/// remainder is `|a| - floor(|a| / |b|) * |b|` with the dividend's sign and
/// the wider of the two fractional widths. A zero divisor raises the
/// division by zero flag and leaves both outputs untouched.
pub(crate) fn div_mod(
    a: &Decimal,
    b: &Decimal,
    quot: Option<&mut Decimal>,
    rem: Option<&mut Decimal>,
    frac_incr: usize,
) -> Status {
    let mut status = Status::default();
    let vb = &b.limbs[..b.int_limbs() + b.frac_limbs()];
    let v = &vb[vb.iter().take_while(|&&l| l == 0).count()..];
    if v.is_empty() {
        status.set_division_by_zero();
        return status;
    }
    let ua = &a.limbs[..a.int_limbs() + a.frac_limbs()];
    let u = &ua[ua.iter().take_while(|&&l| l == 0).count()..];
    if u.is_empty() {
        if let Some(q) = quot {
            *q = Decimal::ZERO;
        }
        if let Some(r) = rem {
            *r = Decimal::ZERO;
        }
        return status;
    }
    let fa9 = a.frac_limbs() * LIMB_DIGITS;
    let fb9 = b.frac_limbs() * LIMB_DIGITS;

    if let Some(q) = quot {
        let neg = a.neg != b.neg;
        // The dividend and divisor fractions were widened to whole limbs;
        // the requested increment shrinks by the widening already applied.
        let incr = frac_incr.saturating_sub((fa9 - a.frac_digits()) + (fb9 - b.frac_digits()));
        let mut wf = limbs_for(fa9 + fb9 + incr);
        // Integer width from the exponent difference of the leading digits;
        // a leading limb compare settles the boundary.
        let eu = (digit_count(u[0]) + LIMB_DIGITS * (u.len() - 1)) as i32 - fa9 as i32;
        let ev = (digit_count(v[0]) + LIMB_DIGITS * (v.len() - 1)) as i32 - fb9 as i32;
        let dintg = (eu - ev + i32::from(u[0] >= v[0])).max(0);
        let wi = limbs_for(dintg as usize);
        if wi > MAX_LIMBS {
            status.set_overflow();
            *q = Decimal::saturated(neg);
            return status;
        }
        if wi + wf > MAX_LIMBS {
            wf = MAX_LIMBS - wi;
            status.set_inexact();
        }
        let f0 = wf * LIMB_DIGITS;
        // Scale the dividend so the limb quotient carries exactly f0
        // fractional digits: W = floor(U * 10^(f0 + fb9 - fa9) / V).
        let shift = ((f0 + fb9) as isize - fa9 as isize) / LIMB_DIGITS as isize;
        let mut ubuf = [0u32; 3 * MAX_LIMBS];
        let mut qbuf = [0u32; 3 * MAX_LIMBS];
        let ulen = u.len() as isize + shift;
        let qlen = if ulen <= 0 {
            0
        } else {
            let ulen = ulen as usize;
            let copy = u.len().min(ulen);
            ubuf[..copy].copy_from_slice(&u[..copy]);
            limb_div(&ubuf[..ulen], v, &mut qbuf)
        };
        let ipart = qlen.saturating_sub(wf);
        let pad = wf.saturating_sub(qlen);
        let mut fbuf = [0u32; MAX_LIMBS];
        fbuf[pad..wf].copy_from_slice(&qbuf[ipart..qlen]);
        let lead = qbuf[..ipart].iter().take_while(|&&l| l == 0).count();
        if ipart - lead + wf > MAX_LIMBS {
            status.set_overflow();
            *q = Decimal::saturated(neg);
        } else {
            *q = Decimal::from_parts(neg, &qbuf[..ipart], &fbuf[..wf], f0);
        }
    }

    if let Some(r) = rem {
        // Integer quotient first: W = floor(U * 10^(fb9 - fa9) / V).
        let shift = (fb9 as isize - fa9 as isize) / LIMB_DIGITS as isize;
        let mut ubuf = [0u32; 3 * MAX_LIMBS];
        let mut qbuf = [0u32; 3 * MAX_LIMBS];
        let ulen = u.len() as isize + shift;
        let qlen = if ulen <= 0 {
            0
        } else {
            let ulen = ulen as usize;
            let copy = u.len().min(ulen);
            ubuf[..copy].copy_from_slice(&u[..copy]);
            limb_div(&ubuf[..ulen], v, &mut qbuf)
        };
        let qsig = &qbuf[qbuf[..qlen].iter().take_while(|&&l| l == 0).count()..qlen];
        // Remainder as |a| - W * |b|, aligned at the decimal point. The
        // product may be wider than a decimal, the difference never is.
        let mut prod = [0u32; 3 * MAX_LIMBS];
        let plen = if qsig.is_empty() {
            0
        } else {
            mul_limbs(qsig, vb, &mut prod)
        };
        let wfb = b.frac_limbs();
        let p_int = plen.saturating_sub(wfb);
        let wfa = a.frac_limbs();
        let wia = a.int_limbs();
        let wi_r = wia.max(p_int);
        let wf_r = wfa.max(wfb);
        let mut diff = [0u32; 4 * MAX_LIMBS];
        let mut borrow = 0i64;
        for j in (0..wf_r).rev() {
            let av = frac_limb(a, j) as i64;
            let pv = if j < wfb && p_int + j < plen {
                i64::from(prod[p_int + j])
            } else {
                0
            };
            let t = av - pv - borrow;
            if t < 0 {
                diff[wi_r + j] = (t + LIMB_BASE as i64) as u32;
                borrow = 1;
            } else {
                diff[wi_r + j] = t as u32;
                borrow = 0;
            }
        }
        for k in 0..wi_r {
            let av = int_limb(a, k) as i64;
            let pv = if k < p_int {
                i64::from(prod[p_int - 1 - k])
            } else {
                0
            };
            let t = av - pv - borrow;
            if t < 0 {
                diff[wi_r - 1 - k] = (t + LIMB_BASE as i64) as u32;
                borrow = 1;
            } else {
                diff[wi_r - 1 - k] = t as u32;
                borrow = 0;
            }
        }
        debug_assert!(borrow == 0);
        let frac = a.frac_digits().max(b.frac_digits());
        let lead = diff[..wi_r].iter().take_while(|&&l| l == 0).count();
        debug_assert!(wi_r - lead + wf_r <= MAX_LIMBS);
        *r = Decimal::from_parts(a.neg, &diff[..wi_r], &diff[wi_r..wi_r + wf_r], frac);
    }

    status
}

/// Computes the limb-wise floor quotient of `u` by `v`.
///
/// `v` must have a non-zero leading limb. Writes big-endian quotient limbs
/// into `q` and returns how many were written; zero when `u` has fewer
/// limbs than `v`.
fn limb_div(u: &[u32], v: &[u32], q: &mut [u32]) -> usize {
    let n = v.len();
    debug_assert!(v[0] != 0);
    if u.len() < n {
        return 0;
    }
    let m = u.len() - n;
    let mut win = [0u32; MAX_LIMBS + 2];
    win[1..=n].copy_from_slice(&u[..n]);
    let v0 = u64::from(v[0]);
    let v1 = if n > 1 { u64::from(v[1]) } else { 0 };
    // The scalar normalization brings the divisor's leading limb to at
    // least half the radix inside the estimate, without touching the limb
    // arrays themselves.
    let norm = LIMB_BASE / (v0 + 1);
    let norm2 = norm * v0 + norm * v1 / LIMB_BASE;
    for j in 0..=m {
        let x = u64::from(win[0]) * LIMB_BASE + u64::from(win[1]);
        let y = if n > 1 { u64::from(win[2]) } else { 0 };
        let mut guess = if win[0] == 0 && u64::from(win[1]) < v0 {
            0
        } else {
            let mut g = (norm * x + norm * y / LIMB_BASE) / norm2;
            if g >= LIMB_BASE {
                g = LIMB_BASE - 1;
            }
            // The estimate never ends up below the true limb; it can sit up
            // to two above it, which the checks against the second divisor
            // limb remove.
            loop {
                let rhat = x as i64 - (g * v0) as i64;
                if rhat < 0 {
                    g -= 1;
                    continue;
                }
                if rhat >= LIMB_BASE as i64 {
                    break;
                }
                if (v1 * g) as i64 > rhat * LIMB_BASE as i64 + y as i64 {
                    g -= 1;
                } else {
                    break;
                }
            }
            g
        };
        if guess > 0 {
            // Multiply and subtract, adding the divisor back if the guess
            // was still one too high.
            let mut carry = 0u64;
            let mut borrow = 0i64;
            for i in (0..n).rev() {
                let p = guess * u64::from(v[i]) + carry;
                carry = p / LIMB_BASE;
                let t = i64::from(win[i + 1]) - (p % LIMB_BASE) as i64 - borrow;
                if t < 0 {
                    win[i + 1] = (t + LIMB_BASE as i64) as u32;
                    borrow = 1;
                } else {
                    win[i + 1] = t as u32;
                    borrow = 0;
                }
            }
            let t0 = i64::from(win[0]) - carry as i64 - borrow;
            if t0 < 0 {
                guess -= 1;
                let mut c = 0u64;
                for i in (0..n).rev() {
                    let s = u64::from(win[i + 1]) + u64::from(v[i]) + c;
                    win[i + 1] = (s % LIMB_BASE) as u32;
                    c = s / LIMB_BASE;
                }
                win[0] = (t0 + c as i64) as u32;
            } else {
                win[0] = t0 as u32;
            }
        }
        while win[0] != 0 || window_ge(&win[1..=n], v) {
            guess += 1;
            let mut borrow = 0i64;
            for i in (0..n).rev() {
                let t = i64::from(win[i + 1]) - i64::from(v[i]) - borrow;
                if t < 0 {
                    win[i + 1] = (t + LIMB_BASE as i64) as u32;
                    borrow = 1;
                } else {
                    win[i + 1] = t as u32;
                    borrow = 0;
                }
            }
            win[0] = (i64::from(win[0]) - borrow) as u32;
        }
        q[j] = guess as u32;
        if j < m {
            for k in 0..n {
                win[k] = win[k + 1];
            }
            win[n] = u[n + j];
        }
    }
    m + 1
}

/// Compares an n-limb window against the divisor.
fn window_ge(win: &[u32], v: &[u32]) -> bool {
    for i in 0..v.len() {
        if win[i] != v[i] {
            return win[i] > v[i];
        }
    }
    true
}
