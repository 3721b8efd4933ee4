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

//! A set of strings stored in a separate-chaining hash table with pluggable hash codes.
//!
//! The table is sized explicitly, hashes keys with one of four [`HashCodeStrategy`]
//! algorithms, compresses the code into a bucket index, and keeps per-bucket insert
//! counters so collision behavior can be compared across strategies and table sizes.
//!
//! # Usage
//!
//! ```rust
//! use chainset::ChainedHashSet;
//! use chainset::HashCodeStrategy;
//!
//! let mut table = ChainedHashSet::new();
//! table.resize(11).unwrap();
//! table.load(["Apple\n", "banana", "cherry  "]).unwrap();
//!
//! assert!(table.contains("apple").unwrap());
//! assert_eq!(table.len(), 3);
//!
//! table.set_strategy(HashCodeStrategy::Polynomial);
//! table.rehash().unwrap();
//! assert!(table.contains("cherry").unwrap());
//!
//! let stats = table.statistics().unwrap();
//! assert_eq!(stats.total_inserts, 3);
//! ```

pub mod error;
pub mod hash;
pub mod interpreter;
mod table;

pub use self::hash::HashCodeStrategy;
pub use self::table::ChainedHashSet;
pub use self::table::Statistics;
