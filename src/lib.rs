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

//! dec9 is a fixed-precision decimal arithmetic library for Rust.
//!
//! # Introduction
//!
//! Binary floating-point numbers can only approximate common decimal
//! numbers. The value 0.1, for example, would need an infinitely recurring
//! binary fraction. In contrast, a decimal number system can represent 0.1
//! exactly, as one tenth. Consequently, binary floating-point cannot be used
//! for financial calculations, or indeed for any calculations where the
//! results achieved are required to match those which might be calculated by
//! hand.
//!
//! dec9 stores numbers exactly, with up to 81 decimal digits split between
//! an integer and a fractional part, following the fixed-point decimal model
//! used by the popular relational database engines: digits are packed nine
//! to a 32-bit limb in radix 10⁹, there is no exponent in the stored form,
//! and operations report exceptional conditions through status flags rather
//! than panics or lost precision.
//!
//! The main types exposed by this library are as follows:
//!
//!  * [`Decimal`], the fixed-precision decimal number, with the standard
//!    arithmetic and comparison operators and conversions to and from
//!    primitive types.
//!
//!  * [`Context`], which hosts most of the actual functions on decimals.
//!    A context configures the behavior of the various operations (e.g.,
//!    rounding mode) and accumulates exceptional conditions (e.g.,
//!    overflow).
//!
//! # Examples
//!
//! The following example demonstrates the basic usage of the library:
//!
//! ```
//! # use std::error::Error;
//! use dec9::Decimal;
//!
//! let x: Decimal = ".1".parse()?;
//! let y: Decimal = ".45".parse()?;
//!
//! assert_eq!((x + y).to_string(), "0.55");
//! # Ok::<_, Box<dyn Error>>(())
//! ```
//!
//! Observing exceptional conditions requires a long-lived context:
//!
//! ```
//! use dec9::{Context, Decimal, DIV_FRAC_INCR};
//!
//! let mut cx = Context::default();
//! let one = Decimal::from(1);
//! let three = Decimal::from(3);
//! let mut q = Decimal::ZERO;
//! cx.div(&one, &three, &mut q, DIV_FRAC_INCR);
//! assert_eq!(q.to_string(), "0.3333");
//! assert!(cx.status().inexact());
//! ```

#![deny(missing_debug_implementations, missing_docs)]

mod arith;
mod codec;
mod context;
mod conv;
mod decimal;
mod error;
mod macros;
mod round;

pub use context::{Context, Rounding, Status};
pub use decimal::{Decimal, DIV_FRAC_INCR, MAX_DIGITS};
pub use error::{ParseDecimalError, TryFromDecimalError};
