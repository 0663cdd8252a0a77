//! Randomised checks of the block alignment guarantees through the public API.

use std::io::{self, Read, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bytewrap::error::Result;
use bytewrap::{BlockReader, BlockWriter, BlocksPiece};

/// Sink that remembers the size of every write it receives.
#[derive(Default)]
struct SizeRecorder {
    data: Vec<u8>,
    sizes: Vec<usize>,
}

impl Write for SizeRecorder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        self.sizes.push(buf.len());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Source that hands out its data in random sized pieces.
struct JitterSource {
    data: Vec<u8>,
    position: usize,
    rng: StdRng,
}

impl Read for JitterSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.data.len() - self.position;
        if remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let n = self.rng.gen_range(1..=remaining.min(buf.len()));
        buf[..n].copy_from_slice(&self.data[self.position..self.position + n]);
        self.position += n;
        Ok(n)
    }
}

fn random_bytes(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen()).collect()
}

#[test]
fn test_writer_sink_calls_are_block_multiples() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..200 {
        let block_size = rng.gen_range(1..=64);
        let len = rng.gen_range(0..2000);
        let data = random_bytes(&mut rng, len);

        let mut writer = BlockWriter::new(block_size, SizeRecorder::default())?;
        let mut offset = 0;
        while offset < data.len() {
            let piece = rng.gen_range(0..=(data.len() - offset).min(150));
            assert_eq!(writer.write_blocks(&data[offset..offset + piece])?, piece);
            assert!(writer.pending() < block_size);
            offset += piece;
        }
        let before_close = writer.get_ref().sizes.len();
        writer.close()?;

        let sink = writer.into_inner();
        assert_eq!(sink.data, data);
        for size in &sink.sizes[..before_close] {
            assert_eq!(size % block_size, 0);
            assert!(*size > 0);
        }

        let tail = data.len() % block_size;
        match sink.sizes.len() - before_close {
            0 => assert_eq!(tail, 0),
            1 => assert_eq!(sink.sizes[before_close], tail),
            extra => panic!("close made {} sink calls", extra),
        }
    }

    Ok(())
}

#[test]
fn test_reader_reads_are_block_multiples() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..200 {
        let block_size = rng.gen_range(1..=64);
        let len = rng.gen_range(0..2000);
        let data = random_bytes(&mut rng, len);
        let source = JitterSource {
            data: data.clone(),
            position: 0,
            rng: StdRng::seed_from_u64(rng.gen()),
        };

        let mut reader = BlockReader::new(block_size, source)?;
        let mut out = Vec::new();
        let mut sizes = Vec::new();
        loop {
            let len = rng.gen_range(block_size..=block_size * 5);
            let mut buf = vec![0u8; len];
            match reader.read_blocks(&mut buf)? {
                BlocksPiece::Blocks(n) => {
                    assert!(n <= len);
                    out.extend_from_slice(&buf[..n]);
                    sizes.push(n);
                }
                BlocksPiece::Pending => {}
                BlocksPiece::EOF => break,
                BlocksPiece::Starved => panic!("Destination holds at least one block"),
            }
        }

        assert_eq!(out, data);
        if let Some((last, rest)) = sizes.split_last() {
            for size in rest {
                assert_eq!(size % block_size, 0);
            }
            let tail = data.len() % block_size;
            assert!(*last % block_size == 0 || *last == tail);
        }

        // End of stream sticks.
        let mut buf = vec![0u8; block_size];
        assert_eq!(reader.read_blocks(&mut buf)?, BlocksPiece::EOF);
    }

    Ok(())
}

#[test]
fn test_starved_reader_leaves_stream_untouched() -> Result<()> {
    let mut reader = BlockReader::new(8, &b"0123456789abcdef"[..])?;
    let mut small = [0u8; 7];
    for _ in 0..10 {
        assert_eq!(reader.read_blocks(&mut small)?, BlocksPiece::Starved);
    }
    assert_eq!(reader.buffered(), 0);
    assert_eq!(reader.get_ref().len(), 16);

    let mut out = Vec::new();
    reader.read_to_end(&mut out)?;
    assert_eq!(out, b"0123456789abcdef");
    Ok(())
}

#[test]
fn test_copy_between_block_adapters() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(7);
    let data = random_bytes(&mut rng, 10_000);

    let mut reader = BlockReader::new(96, &data[..])?;
    let mut writer = BlockWriter::new(64, SizeRecorder::default())?;
    io::copy(&mut reader, &mut writer)?;
    writer.close()?;

    let sink = writer.into_inner();
    assert_eq!(sink.data, data);
    let (last, rest) = sink.sizes.split_last().expect("sink saw writes");
    assert!(rest.iter().all(|size| size % 64 == 0));
    assert_eq!(*last, 10_000 % 64);
    Ok(())
}

#[test]
fn test_std_helpers_with_large_blocks() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(99);

    for block_size in [33, 64, 4096, 10_000] {
        let data = random_bytes(&mut rng, 25_000);

        let mut reader = BlockReader::new(block_size, &data[..])?;
        let mut out = Vec::new();
        assert_eq!(reader.read_to_end(&mut out)?, data.len());
        assert_eq!(out, data, "read_to_end, block size {}", block_size);

        let mut reader = BlockReader::new(block_size, &data[..])?;
        let mut out = Vec::new();
        assert_eq!(io::copy(&mut reader, &mut out)?, data.len() as u64);
        assert_eq!(out, data, "io::copy, block size {}", block_size);
    }

    Ok(())
}
