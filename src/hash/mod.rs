// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Hash code strategies and the compression function.
//!
//! A key is first turned into an integer hash code by one of four strategies, then the code
//! is compressed into a bucket index with a multiply-add-divide step:
//!
//! ```text
//! index = (|7 * code + 103| mod 109345121) mod bucket_count
//! ```
//!
//! Hash codes are computed with wrapping 64-bit arithmetic so that every strategy is total
//! over arbitrary byte content, including the empty string (which always yields `0`).
//!
//! # Usage
//!
//! ```rust
//! # use std::num::NonZeroUsize;
//! # use chainset::hash::{HashCodeStrategy, compress};
//! let code = HashCodeStrategy::Simple.hash_code("cat");
//! assert_eq!(code, 24);
//!
//! let buckets = NonZeroUsize::new(7).unwrap();
//! assert_eq!(compress(code, buckets), 5);
//! ```

use std::fmt;
use std::num::NonZeroUsize;

/// Multiplier of the compression step.
const COMPRESS_SCALE: i128 = 7;

/// Additive shift of the compression step.
const COMPRESS_SHIFT: i128 = 103;

/// Large modulus applied before reducing to the bucket count.
const COMPRESS_MODULUS: u128 = 109_345_121;

/// Base of the polynomial accumulation.
const POLY_BASE: i64 = 33;

/// Rotation amount of the cyclic-shift hash.
const CYCLIC_SHIFT: u32 = 5;

/// Offset mapping lowercase ASCII to alphabet positions (`a` = 1).
const ALPHA_OFFSET: i64 = 96;

/// Offset of the exponential sum (`a` = 5).
const CUSTOM_OFFSET: i64 = 92;

/// Algorithm used to turn a key into an integer hash code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HashCodeStrategy {
    /// Sum of alphabet positions.
    #[default]
    Simple,
    /// Base-33 polynomial over alphabet positions, most significant character first.
    Polynomial,
    /// 5-bit cyclic shift over 32-bit unsigned arithmetic.
    Cyclic,
    /// Exponential sum with exponents counting down from the key length.
    Custom,
}

impl HashCodeStrategy {
    /// All strategies, in declaration order.
    pub const ALL: [HashCodeStrategy; 4] = [
        HashCodeStrategy::Simple,
        HashCodeStrategy::Polynomial,
        HashCodeStrategy::Cyclic,
        HashCodeStrategy::Custom,
    ];

    /// Looks up a strategy by its command token.
    ///
    /// Recognized tokens are `simple`, `poly`, `cyclic` and `custom`. Matching is exact;
    /// case folding is left to the caller.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "simple" => Some(HashCodeStrategy::Simple),
            "poly" => Some(HashCodeStrategy::Polynomial),
            "cyclic" => Some(HashCodeStrategy::Cyclic),
            "custom" => Some(HashCodeStrategy::Custom),
            _ => None,
        }
    }

    /// The command token naming this strategy.
    pub const fn name(self) -> &'static str {
        match self {
            HashCodeStrategy::Simple => "simple",
            HashCodeStrategy::Polynomial => "poly",
            HashCodeStrategy::Cyclic => "cyclic",
            HashCodeStrategy::Custom => "custom",
        }
    }

    /// Computes the raw hash code of `key`.
    pub fn hash_code(self, key: &str) -> i64 {
        let bytes = key.as_bytes();
        match self {
            HashCodeStrategy::Simple => simple(bytes),
            HashCodeStrategy::Polynomial => polynomial(bytes),
            HashCodeStrategy::Cyclic => cyclic(bytes),
            HashCodeStrategy::Custom => custom(bytes),
        }
    }
}

impl fmt::Display for HashCodeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps any hash code into `[0, bucket_count)`.
pub fn compress(code: i64, bucket_count: NonZeroUsize) -> usize {
    let scaled = (COMPRESS_SCALE * code as i128 + COMPRESS_SHIFT).unsigned_abs();
    // The first reduction keeps the value below 2^27, so the cast back cannot truncate.
    ((scaled % COMPRESS_MODULUS) as usize) % bucket_count.get()
}

#[inline]
fn alpha(byte: u8) -> i64 {
    byte as i64 - ALPHA_OFFSET
}

fn simple(bytes: &[u8]) -> i64 {
    bytes
        .iter()
        .fold(0i64, |sum, &b| sum.wrapping_add(alpha(b)))
}

/// Base-33 polynomial via Horner's rule, reduced modulo 2^64.
///
/// This equals `sum(coeff_i * 33^(L-1-i))` only while that sum fits in an `i64`, which holds
/// for lowercase keys of up to 12 letters. Longer keys wrap, so their bucket differs from the
/// one the unbounded integer would compress to.
fn polynomial(bytes: &[u8]) -> i64 {
    bytes.iter().fold(0i64, |acc, &b| {
        acc.wrapping_mul(POLY_BASE).wrapping_add(alpha(b))
    })
}

fn cyclic(bytes: &[u8]) -> i64 {
    let acc = bytes.iter().fold(0u32, |acc, &b| {
        acc.rotate_left(CYCLIC_SHIFT).wrapping_add(b as u32)
    });
    // reinterpret as signed 32-bit
    acc as i32 as i64
}

/// Exponential sum reduced modulo 2^64; like [`polynomial`], long keys wrap instead of
/// growing without bound.
fn custom(bytes: &[u8]) -> i64 {
    let len = bytes.len();
    bytes.iter().enumerate().fold(0i64, |sum, (i, &b)| {
        let exponent = u32::try_from(len - i).unwrap_or(u32::MAX);
        let base = b as i64 - CUSTOM_OFFSET;
        sum.wrapping_add(base.wrapping_pow(exponent))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buckets(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_empty_key_hashes_to_zero() {
        for strategy in HashCodeStrategy::ALL {
            assert_eq!(strategy.hash_code(""), 0, "strategy {strategy}");
        }
    }

    #[test]
    fn test_simple() {
        assert_eq!(HashCodeStrategy::Simple.hash_code("a"), 1);
        assert_eq!(HashCodeStrategy::Simple.hash_code("z"), 26);
        assert_eq!(HashCodeStrategy::Simple.hash_code("cat"), 24);
        assert_eq!(HashCodeStrategy::Simple.hash_code("dog"), 26);
        // anagrams collide
        assert_eq!(
            HashCodeStrategy::Simple.hash_code("act"),
            HashCodeStrategy::Simple.hash_code("cat")
        );
        // non-letters are not sanitized
        assert_eq!(HashCodeStrategy::Simple.hash_code("0"), 48 - 96);
    }

    #[test]
    fn test_polynomial() {
        assert_eq!(HashCodeStrategy::Polynomial.hash_code("a"), 1);
        assert_eq!(HashCodeStrategy::Polynomial.hash_code("ab"), 33 + 2);
        assert_eq!(
            HashCodeStrategy::Polynomial.hash_code("dog"),
            4 * 33 * 33 + 15 * 33 + 7
        );
        assert_ne!(
            HashCodeStrategy::Polynomial.hash_code("act"),
            HashCodeStrategy::Polynomial.hash_code("cat")
        );
    }

    #[test]
    fn test_polynomial_wraps_past_twelve_letters() {
        let exact = |key: &str| {
            key.bytes()
                .fold(0i128, |acc, b| acc * 33 + (b as i128 - 96))
        };
        let twelve = "zzzzzzzzzzzz";
        assert_eq!(
            HashCodeStrategy::Polynomial.hash_code(twelve) as i128,
            exact(twelve)
        );

        let thirteen = "zzzzzzzzzzzzz";
        let code = HashCodeStrategy::Polynomial.hash_code(thirteen);
        assert_ne!(code as i128, exact(thirteen));
        assert_eq!(code, exact(thirteen) as i64);
    }

    #[test]
    fn test_cyclic() {
        assert_eq!(HashCodeStrategy::Cyclic.hash_code("a"), 97);
        assert_eq!(HashCodeStrategy::Cyclic.hash_code("ab"), (97 << 5) + 98);
        // after seven characters the top bits wrap around into the low bits
        let long = "zzzzzzzzzzzzzzzz";
        let mut acc = 0u32;
        for b in long.bytes() {
            acc = ((acc << 5) | (acc >> 27)).wrapping_add(b as u32);
        }
        assert_eq!(HashCodeStrategy::Cyclic.hash_code(long), acc as i32 as i64);
    }

    #[test]
    fn test_custom() {
        assert_eq!(HashCodeStrategy::Custom.hash_code("a"), 5);
        assert_eq!(HashCodeStrategy::Custom.hash_code("ab"), 5 * 5 + 6);
        assert_eq!(HashCodeStrategy::Custom.hash_code("abc"), 125 + 36 + 7);
    }

    #[test]
    fn test_very_long_keys_do_not_panic() {
        let key = "q".repeat(10_000);
        for strategy in HashCodeStrategy::ALL {
            let code = strategy.hash_code(&key);
            assert!(compress(code, buckets(101)) < 101);
        }
    }

    #[test]
    fn test_compress() {
        assert_eq!(compress(24, buckets(7)), 271 % 7);
        assert_eq!(compress(0, buckets(1000)), 103);
        // negative codes use the absolute value of the scaled code
        assert_eq!(compress(-10, buckets(7)), 33 % 7);
        assert_eq!(compress(-100, buckets(7)), 597 % 7);
        // the large modulus applies before the bucket count
        assert_eq!(compress(15_620_731, buckets(1 << 30)), 109_345_220 % 109_345_121);
    }

    #[test]
    fn test_compress_range() {
        let codes = [i64::MIN, i64::MIN + 1, -1, 0, 1, 42, i64::MAX];
        for n in [1usize, 2, 7, 10, 109_345_121, usize::MAX] {
            for code in codes {
                assert!(compress(code, buckets(n)) < n, "code {code} n {n}");
            }
        }
    }

    #[test]
    fn test_names() {
        for strategy in HashCodeStrategy::ALL {
            assert_eq!(HashCodeStrategy::from_name(strategy.name()), Some(strategy));
        }
        assert_eq!(HashCodeStrategy::from_name("Poly"), None);
        assert_eq!(HashCodeStrategy::from_name("polynomial"), None);
        assert_eq!(HashCodeStrategy::default(), HashCodeStrategy::Simple);
    }
}
