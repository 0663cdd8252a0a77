//! Block-aligning stream adapters.
//!
//! The adapters in this module force all data crossing them into whole multiples of a
//! configured block size:
//!
//! - [`reader::BlockReader`]: only ever hands the caller whole blocks, except for the
//!   final short block at end of stream.
//! - [`writer::BlockWriter`]: only ever forwards whole blocks to its sink; the final
//!   short block leaves on [`writer::BlockWriter::close`].
//!
//! Both are the two directions of one state machine built on the shared
//! [`buffer::BlockBuffer`].
//!
//! # Data flow
//!
//! ```text
//!          write_blocks("01234")           write_blocks("5678")         close()
//! caller ------------------------> [ "4" ] ----------------> [ "8" ] ----------> sink: "8"
//!                 |                                |
//!                 v                                v
//!           sink: "0123"                     sink: "4567"
//! ```
//!
//! (block size 2 in the picture above.)

pub(crate) mod buffer;
pub mod reader;
pub mod utils;
pub mod writer;
