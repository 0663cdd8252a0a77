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

//! Constants shared by the bytewrap decorators.

/// Default block size for block adapters (4 KiB).
pub const DEFAULT_BLOCK_SIZE: usize = 1 << 12;

/// Scratch buffer used by `read_to_end` / `read_to_string` (8 KiB, as in `std::io`).
pub const READ_TO_END_BUFFER_SIZE: usize = 2 * DEFAULT_BLOCK_SIZE;

/// Smallest block size a block adapter accepts.
pub const MIN_BLOCK_SIZE: usize = 1;

/// The HighwayHash key used by the streaming checksum observer.
/// This is 'bytewrap', 'checksum', 'bytewrap', 'checksum' in 64-bit little endian chunks.
pub const HIGHWAY_HASH_KEY: [u64; 4] = [
    0x7061727765747962,
    0x6d75736b63656863,
    0x7061727765747962,
    0x6d75736b63656863,
];
