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

//! Integration tests writing real files through a block writer and reading them back
//! through a block reader.

use std::fs::File;
use std::io::{BufWriter, Read, Write};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use bytewrap::blocks::reader::{BlockReader, BlocksPiece};
use bytewrap::blocks::writer::{BlockWriter, BlockWriterConfig};
use bytewrap::error::Result;
use bytewrap::hash::{hash_reader, hash_writer};

/// Deterministic test payload.
fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i * 7 + i / 256) % 256) as u8).collect()
}

/// Writes `data` to a temp file in `piece` sized writes through a block writer.
fn write_file(data: &[u8], block_size: usize, piece: usize) -> Result<NamedTempFile> {
    let file = NamedTempFile::new()?;
    let config = BlockWriterConfig::with_block_size(block_size)?;
    let mut writer = BlockWriter::with_config(file.reopen()?, config)?;

    for chunk in data.chunks(piece) {
        writer.write_all(chunk)?;
    }
    writer.close()?;

    Ok(file)
}

#[test]
fn test_round_trip_through_file() -> Result<()> {
    let data = payload(100_000);

    for (block_size, piece) in [(512, 333), (4096, 10_000), (1, 77), (999, 1000)] {
        let file = write_file(&data, block_size, piece)?;
        assert_eq!(file.as_file().metadata()?.len(), data.len() as u64);

        let mut reader = BlockReader::new(block_size, File::open(file.path())?)?;
        let mut out = Vec::new();
        let mut buf = vec![0u8; block_size * 4];
        loop {
            match reader.read_blocks(&mut buf)? {
                BlocksPiece::Blocks(n) => out.extend_from_slice(&buf[..n]),
                BlocksPiece::Pending => {}
                BlocksPiece::EOF => break,
                BlocksPiece::Starved => panic!("Buffer holds four blocks"),
            }
        }
        assert_eq!(out, data, "block size {}", block_size);
    }

    Ok(())
}

#[test]
fn test_missing_close_loses_tail() -> Result<()> {
    let data = payload(1000);
    let file = NamedTempFile::new()?;

    let mut writer = BlockWriter::new(256, file.reopen()?)?;
    writer.write_all(&data)?;
    assert_eq!(writer.pending(), 1000 % 256);
    drop(writer.into_inner());

    // Only whole blocks reached the file.
    assert_eq!(file.as_file().metadata()?.len(), 768);
    Ok(())
}

#[test]
fn test_digest_of_file_matches_on_both_sides() -> Result<()> {
    let data = payload(50_000);
    let file = NamedTempFile::new()?;

    let block_writer = BlockWriter::new(4096, BufWriter::new(file.reopen()?))?;
    let mut writer = hash_writer(Sha256::new(), block_writer);
    for chunk in data.chunks(1234) {
        writer.write_all(chunk)?;
    }
    writer.get_mut().close()?;
    let (_, written_digest) = writer.into_parts();

    let block_reader = BlockReader::new(4096, File::open(file.path())?)?;
    let mut reader = hash_reader(Sha256::new(), block_reader);
    let mut out = Vec::new();
    let mut buf = vec![0u8; 8192];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    let (_, read_digest) = reader.into_parts();

    let expected = Sha256::digest(&data);
    assert_eq!(out, data);
    assert_eq!(written_digest.into_digest().finalize(), expected);
    assert_eq!(read_digest.into_digest().finalize(), expected);
    Ok(())
}
