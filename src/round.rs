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

//! Rounding of a decimal at an arbitrary digit position.

use crate::context::{Rounding, Status};
use crate::decimal::{limbs_for, Decimal, LIMB_BASE, LIMB_DIGITS, MAX_DIGITS, MAX_LIMBS, POW10};

/// Rounds `d` at the decimal position `scale` under `mode`.
///
/// A positive `scale` keeps that many fractional digits, zero rounds to an
/// integer, and a negative `scale` rounds to a multiple of
/// 10<sup>-scale</sup>. A `scale` at or beyond the stored fractional width
/// pads zeros up to the storage capacity. The rounding decision is made on
/// the magnitude; the sign is reapplied afterwards.
pub(crate) fn round(d: &Decimal, scale: i32, mode: Rounding) -> (Decimal, Status) {
    let mut status = Status::default();
    let scale = scale.clamp(-(MAX_DIGITS as i32), MAX_DIGITS as i32);
    let frac = d.frac_digits as i32;
    if scale >= frac {
        let cap = ((MAX_LIMBS - d.int_limbs()) * LIMB_DIGITS) as i32;
        let mut out = *d;
        out.frac_digits = scale.min(cap).max(frac) as u8;
        return (out, status);
    }

    let wi = d.int_limbs() as i32;
    // The digit slots of the limb array run 0..9*(wi+wf); the first
    // discarded digit sits at the cut slot, which lands left of slot 0 for
    // large negative scales.
    let cut = wi * LIMB_DIGITS as i32 + scale;
    let first_dropped = if cut >= 0 { digit_at(d, cut as usize) } else { 0 };
    let rest_dropped = tail_nonzero(d, cut + 1);
    let kept = if cut >= 1 {
        digit_at(d, cut as usize - 1)
    } else {
        0
    };
    let up = match mode {
        Rounding::Truncate => false,
        Rounding::Ceiling => first_dropped != 0 || rest_dropped,
        Rounding::HalfEven => {
            first_dropped > 5 || (first_dropped == 5 && (rest_dropped || kept % 2 == 1))
        }
    };
    if first_dropped != 0 || rest_dropped {
        status.set_inexact();
    }

    let frac_out = scale.max(0) as usize;
    let wf_out = limbs_for(frac_out);

    // Stage the kept limbs with one spare limb in front for an increment
    // that outgrows the current leading limb.
    let mut scratch = [0u32; MAX_LIMBS + 1];
    if cut > 0 {
        let keep_limbs = (cut as usize + LIMB_DIGITS - 1) / LIMB_DIGITS;
        scratch[1..1 + keep_limbs].copy_from_slice(&d.limbs[..keep_limbs]);
        let partial = cut as usize % LIMB_DIGITS;
        if partial != 0 {
            let l = &mut scratch[keep_limbs];
            *l -= *l % POW10[LIMB_DIGITS - partial];
        }
    }
    if up {
        let unit_slot = cut - 1;
        let li = unit_slot.div_euclid(LIMB_DIGITS as i32);
        if li < -1 {
            // Everything stored sits below the rounding unit, so the result
            // is the unit itself: a one followed by -scale zeros.
            let digits = (-scale) as usize + 1;
            if digits > MAX_DIGITS {
                status.set_overflow();
                return (Decimal::saturated(d.neg), status);
            }
            let wi_out = limbs_for(digits);
            let mut limbs = [0u32; MAX_LIMBS];
            limbs[0] = POW10[(digits - 1) % LIMB_DIGITS];
            return (
                Decimal::from_parts(d.neg, &limbs[..wi_out], &[], 0),
                status,
            );
        }
        let offset = unit_slot.rem_euclid(LIMB_DIGITS as i32) as usize;
        let mut idx = (li + 1) as usize;
        let mut carry = u64::from(POW10[LIMB_DIGITS - 1 - offset]);
        loop {
            let t = u64::from(scratch[idx]) + carry;
            scratch[idx] = (t % LIMB_BASE) as u32;
            carry = t / LIMB_BASE;
            if carry == 0 || idx == 0 {
                break;
            }
            idx -= 1;
        }
    }

    let int_part = &scratch[..1 + wi as usize];
    let lead = int_part.iter().take_while(|&&l| l == 0).count();
    if int_part.len() - lead + wf_out > MAX_LIMBS {
        status.set_overflow();
        return (Decimal::saturated(d.neg), status);
    }
    let frac_part = &scratch[1 + wi as usize..1 + wi as usize + wf_out];
    (
        Decimal::from_parts(d.neg, int_part, frac_part, frac_out),
        status,
    )
}

/// Reads the decimal digit at a limb-array slot.
fn digit_at(d: &Decimal, slot: usize) -> u32 {
    (d.limbs[slot / LIMB_DIGITS] / POW10[LIMB_DIGITS - 1 - slot % LIMB_DIGITS]) % 10
}

/// Reports whether any digit at or after `from` is non-zero.
fn tail_nonzero(d: &Decimal, from: i32) -> bool {
    let total = (d.int_limbs() + d.frac_limbs()) * LIMB_DIGITS;
    let from = from.max(0) as usize;
    if from >= total {
        return false;
    }
    let li = from / LIMB_DIGITS;
    if d.limbs[li] % POW10[LIMB_DIGITS - from % LIMB_DIGITS] != 0 {
        return true;
    }
    d.limbs[li + 1..total / LIMB_DIGITS].iter().any(|&l| l != 0)
}
