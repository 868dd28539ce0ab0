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

#[macro_export]
/// A macro to construct a [`Decimal`] from a literal.
/// Converts the input tokens to a string, and then parses the string into a [`Decimal`].
/// Panics if the provided input is not a valid [`Decimal`] literal.
///
/// [`Decimal`]: crate::Decimal
///
/// # Examples:
/// ```
/// use dec9::dec;
///
/// assert!(dec!(1.753).to_string() == "1.753");
/// assert!(dec!(0).is_zero());
/// assert!(dec!(-0.1).is_negative());
/// ```
macro_rules! dec {
    ($l:expr) => {
        <$crate::Decimal as ::std::str::FromStr>::from_str(stringify!($l))
            .unwrap_or_else(|e| panic!("{}", e.to_string()))
    };
}
