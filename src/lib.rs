// Copyright 2024
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Bytewrap provides composable decorators for `std::io` readers and writers.
//!
//! Every decorator observes or reshapes the bytes flowing through a stream without
//! changing the "read some bytes" / "write some bytes" contract:
//!
//! - [`wrap`]: hands every transferred chunk to a [`observer::ByteObserver`].
//! - [`hash`] and [`stats`]: ready-made observers for digests and running counters.
//! - [`blocks`]: a reader and a writer that only ever deliver data in whole multiples
//!   of a configured block size, buffering partial blocks across calls.
//!
//! # Example
//!
//! ```
//! use std::io::Write;
//! use bytewrap::blocks::writer::BlockWriter;
//!
//! let mut writer = BlockWriter::new(4, Vec::new()).unwrap();
//! writer.write_all(b"0123456789").unwrap();
//! assert_eq!(writer.get_ref().as_slice(), b"01234567");
//!
//! // The tail that does not fill a block only leaves on close.
//! writer.close().unwrap();
//! assert_eq!(writer.into_inner().as_slice(), b"0123456789");
//! ```

pub mod blocks;
pub mod constants;
pub mod error;
pub mod hash;
pub mod observer;
pub mod stats;
pub mod wrap;


pub use blocks::reader::{BlockReader, BlocksPiece};
pub use blocks::writer::BlockWriter;
pub use error::{Result, WrapError};
pub use observer::ByteObserver;
pub use wrap::{WrapReader, WrapWriter};
