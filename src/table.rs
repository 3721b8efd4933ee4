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

//! Separate-chaining hash set of strings.

use std::fmt;
use std::io::BufRead;
use std::num::NonZeroUsize;

use log::debug;
use log::warn;

use crate::error::Error;
use crate::error::ErrorKind;
use crate::error::Result;
use crate::hash::HashCodeStrategy;
use crate::hash::compress;

/// Characters stripped from the end of every loaded line.
const TRAILING_WHITESPACE: [char; 4] = [' ', '\n', '\r', '\t'];

/// A set of string keys stored in an array of collision chains.
///
/// The table starts with zero buckets and must be sized with [`resize`](Self::resize) before
/// any key can be placed. Every bucket keeps its keys in insertion order, together with a
/// counter of insertions routed to it since the last resize; the counters feed
/// [`statistics`](Self::statistics).
///
/// Changing the strategy with [`set_strategy`](Self::set_strategy) does not move existing
/// keys. Lookups use the new strategy immediately, so keys placed under the old one may be
/// unreachable until the next [`rehash`](Self::rehash).
#[derive(Debug, Clone, Default)]
pub struct ChainedHashSet {
    buckets: Vec<Vec<String>>,
    // inserts per bucket since the last resize, not current occupancy
    insert_counts: Vec<usize>,
    strategy: HashCodeStrategy,
}

/// Aggregate collision statistics of a [`ChainedHashSet`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    /// Number of buckets.
    pub bucket_count: usize,
    /// Sum of all per-bucket insert counters.
    pub total_inserts: usize,
    /// `total_inserts / bucket_count`.
    pub load_factor: f64,
    /// Sum over buckets of `max(inserts - 1, 0)`.
    pub total_collisions: usize,
    /// Largest single-bucket insert counter.
    pub max_bucket_inserts: usize,
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "size:\t\t\t{}", self.bucket_count)?;
        writeln!(f, "inserts:\t\t{}", self.total_inserts)?;
        writeln!(f, "load factor:\t{}", format_general(self.load_factor))?;
        writeln!(f, "collisions:\t\t{}", self.total_collisions)?;
        writeln!(f, "max. bucket:\t{}", self.max_bucket_inserts)
    }
}

impl ChainedHashSet {
    /// Creates an empty table with zero buckets and the [`Simple`](HashCodeStrategy::Simple)
    /// strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table with zero buckets that hashes with `strategy`.
    pub fn with_strategy(strategy: HashCodeStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of buckets, under the name existing callers use.
    ///
    /// This is the bucket capacity, not the number of stored keys. See
    /// [`len`](Self::len) for the latter.
    pub fn size(&self) -> usize {
        self.bucket_count()
    }

    /// Number of keys stored across all chains.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Same as [`len`](Self::len).
    pub fn element_count(&self) -> usize {
        self.len()
    }

    /// Returns true if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// The active hash code strategy.
    pub fn strategy(&self) -> HashCodeStrategy {
        self.strategy
    }

    /// Switches the strategy used by all future hash computations.
    ///
    /// Existing keys are not moved; call [`rehash`](Self::rehash) to re-place them.
    pub fn set_strategy(&mut self, strategy: HashCodeStrategy) {
        if strategy != self.strategy {
            debug!(
                "hash code strategy changed from {} to {}",
                self.strategy, strategy
            );
        }
        self.strategy = strategy;
    }

    /// Switches the strategy by its command token (`simple`, `poly`, `cyclic`, `custom`).
    ///
    /// Unrecognized names leave the strategy unchanged and return false.
    pub fn set_strategy_by_name(&mut self, name: &str) -> bool {
        match HashCodeStrategy::from_name(name) {
            Some(strategy) => {
                self.set_strategy(strategy);
                true
            }
            None => {
                warn!(
                    "ignoring unrecognized hash code strategy {name:?}; keeping {}",
                    self.strategy
                );
                false
            }
        }
    }

    fn checked_bucket_count(&self, operation: &'static str) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.buckets.len()).ok_or_else(|| Error::uninitialized(operation))
    }

    fn index_of(&self, key: &str, bucket_count: NonZeroUsize) -> usize {
        compress(self.strategy.hash_code(key), bucket_count)
    }

    /// Returns the bucket `key` maps to under the current strategy and bucket count.
    pub fn bucket_of(&self, key: &str) -> Result<usize> {
        let n = self.checked_bucket_count("hash")?;
        Ok(self.index_of(key, n))
    }

    /// Returns the index of the bucket holding `key`, or `None` if the key is absent.
    ///
    /// Only the bucket `key` currently hashes to is searched.
    pub fn find(&self, key: &str) -> Result<Option<usize>> {
        let n = self.checked_bucket_count("find")?;
        let index = self.index_of(key, n);
        let found = self.buckets[index].iter().any(|k| k == key);
        Ok(found.then_some(index))
    }

    /// Returns true if `key` is found by [`find`](Self::find).
    pub fn contains(&self, key: &str) -> Result<bool> {
        self.find(key).map(|index| index.is_some())
    }

    /// Inserts `key` at the end of its chain unless it is already present.
    ///
    /// Returns true if the key was inserted.
    pub fn put(&mut self, key: &str) -> Result<bool> {
        let n = self.checked_bucket_count("put")?;
        Ok(self.put_owned(key.to_string(), n))
    }

    fn put_owned(&mut self, key: String, bucket_count: NonZeroUsize) -> bool {
        let index = self.index_of(&key, bucket_count);
        let chain = &mut self.buckets[index];
        if chain.contains(&key) {
            return false;
        }
        chain.push(key);
        self.insert_counts[index] += 1;
        true
    }

    /// Removes `key` from its chain and decrements that bucket's insert counter.
    ///
    /// Returns true if the key was present. Absent keys are a no-op.
    pub fn erase(&mut self, key: &str) -> Result<bool> {
        let Some(index) = self.find(key)? else {
            return Ok(false);
        };
        self.buckets[index].retain(|k| k != key);
        self.insert_counts[index] = self.insert_counts[index].saturating_sub(1);
        Ok(true)
    }

    /// Reallocates the table with `new_size` buckets and re-inserts every key under the
    /// current strategy.
    ///
    /// Keys are replayed in old bucket order, then chain order. Insert counters are reset
    /// before the replay, so afterwards they describe the new placement only.
    ///
    /// Fails without touching the table if `new_size` is zero or the buckets cannot be
    /// allocated.
    pub fn resize(&mut self, new_size: usize) -> Result<()> {
        let n = positive_size(new_size)?;
        let (buckets, insert_counts) = allocate(n)?;

        let old_buckets = std::mem::replace(&mut self.buckets, buckets);
        self.insert_counts = insert_counts;
        debug!(
            "resizing hash table from {} to {} buckets with {} strategy",
            old_buckets.len(),
            new_size,
            self.strategy
        );

        for key in old_buckets.into_iter().flatten() {
            self.put_owned(key, n);
        }
        Ok(())
    }

    /// Re-places every key under the current strategy without changing the bucket count.
    pub fn rehash(&mut self) -> Result<()> {
        let n = self.checked_bucket_count("rehash")?;
        self.resize(n.get())
    }

    /// Drops every key and counter and sizes the table to `new_size` empty buckets.
    ///
    /// Fails without touching the table if `new_size` is zero or the buckets cannot be
    /// allocated.
    pub fn reset(&mut self, new_size: usize) -> Result<()> {
        let (buckets, insert_counts) = allocate(positive_size(new_size)?)?;
        self.buckets = buckets;
        self.insert_counts = insert_counts;
        Ok(())
    }

    /// Computes aggregate insert and collision statistics.
    pub fn statistics(&self) -> Result<Statistics> {
        let n = self.checked_bucket_count("statistics")?;
        let total_inserts: usize = self.insert_counts.iter().sum();
        let total_collisions = self
            .insert_counts
            .iter()
            .map(|&inserts| inserts.saturating_sub(1))
            .sum();
        let max_bucket_inserts = self.insert_counts.iter().copied().max().unwrap_or(0);

        Ok(Statistics {
            bucket_count: n.get(),
            total_inserts,
            load_factor: total_inserts as f64 / n.get() as f64,
            total_collisions,
            max_bucket_inserts,
        })
    }

    /// Inserts every line after lowercasing it and stripping trailing whitespace.
    ///
    /// Blank lines become the empty key.
    pub fn load<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let n = self.checked_bucket_count("load")?;
        for line in lines {
            self.put_owned(normalize(line.as_ref()), n);
        }
        Ok(())
    }

    /// Same as [`load`](Self::load), reading `\n`-separated lines from `reader`.
    ///
    /// Lines are not required to be UTF-8; invalid sequences become U+FFFD.
    pub fn load_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let n = self.checked_bucket_count("load")?;
        for line in reader.split(b'\n') {
            let line = line.map_err(|err| {
                Error::new(ErrorKind::Io, "failed to read line").set_source(err)
            })?;
            self.put_owned(normalize(&String::from_utf8_lossy(&line)), n);
        }
        Ok(())
    }

    /// Iterates over `(bucket index, chain)` pairs in bucket order.
    pub fn buckets(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(index, chain)| (index, chain.as_slice()))
    }
}

/// Renders one line per bucket: the index, a tab, then each key followed by a tab.
impl fmt::Display for ChainedHashSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.buckets() {
            write!(f, "{index}:\t")?;
            for key in chain {
                write!(f, "{key}\t")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn positive_size(new_size: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(new_size).ok_or_else(|| {
        Error::new(ErrorKind::InvalidArgument, "bucket count must be positive")
            .with_context("new_size", new_size)
    })
}

/// Allocates empty chains and zeroed counters, failing instead of aborting on huge sizes.
fn allocate(bucket_count: NonZeroUsize) -> Result<(Vec<Vec<String>>, Vec<usize>)> {
    let size = bucket_count.get();
    let mut buckets = Vec::new();
    let mut insert_counts = Vec::new();
    buckets
        .try_reserve_exact(size)
        .and_then(|()| insert_counts.try_reserve_exact(size))
        .map_err(|err| {
            Error::new(ErrorKind::InvalidArgument, "cannot allocate buckets")
                .with_context("new_size", size)
                .set_source(err)
        })?;
    buckets.resize_with(size, Vec::new);
    insert_counts.resize(size, 0);
    Ok((buckets, insert_counts))
}

/// Formats like a C++ stream with default precision: six significant digits, trailing
/// zeros dropped, scientific notation outside `[1e-5, 1e6)`.
fn format_general(value: f64) -> String {
    const PRECISION: i32 = 6;

    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }
    let exponent = value.abs().log10().floor() as i32;
    if !(-5..PRECISION).contains(&exponent) {
        let formatted = format!("{:.*e}", (PRECISION - 1) as usize, value);
        let (mantissa, exp) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
        let exp: i32 = exp.parse().unwrap_or(0);
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.abs());
    }
    let decimals = (PRECISION - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{value:.decimals$}")).to_string()
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

fn normalize(line: &str) -> String {
    line.to_ascii_lowercase()
        .trim_end_matches(TRAILING_WHITESPACE)
        .to_string()
}
