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

#![cfg(feature = "serde")]

use serde_test::{assert_tokens, Token};

use dec9::Context;

#[test]
fn test_serde() {
    let mut cx = Context::default();
    let d = cx.parse("-12.34").unwrap();

    assert_tokens(
        &d,
        &[
            Token::Struct {
                name: "Decimal",
                len: 4,
            },
            Token::Str("neg"),
            Token::Bool(true),
            Token::Str("int_digits"),
            Token::U8(2),
            Token::Str("frac_digits"),
            Token::U8(2),
            Token::Str("limbs"),
            Token::Tuple { len: 9 },
            Token::U32(12),
            Token::U32(340000000),
            Token::U32(0),
            Token::U32(0),
            Token::U32(0),
            Token::U32(0),
            Token::U32(0),
            Token::U32(0),
            Token::U32(0),
            Token::TupleEnd,
            Token::StructEnd,
        ],
    );

    let d = cx
        .parse("1234567890123456789012345678901234567890")
        .unwrap();

    assert_tokens(
        &d,
        &[
            Token::Struct {
                name: "Decimal",
                len: 4,
            },
            Token::Str("neg"),
            Token::Bool(false),
            Token::Str("int_digits"),
            Token::U8(40),
            Token::Str("frac_digits"),
            Token::U8(0),
            Token::Str("limbs"),
            Token::Tuple { len: 9 },
            Token::U32(1234),
            Token::U32(567890123),
            Token::U32(456789012),
            Token::U32(345678901),
            Token::U32(234567890),
            Token::U32(0),
            Token::U32(0),
            Token::U32(0),
            Token::U32(0),
            Token::TupleEnd,
            Token::StructEnd,
        ],
    );
}
