//! Byte-stream abstraction consumed by the demuxers.
//!
//! Demuxers are generic over any seekable byte source; files, memory
//! buffers, and buffered readers all qualify through the blanket impl.

use std::io::{Read, Seek, SeekFrom};

/// A blocking, seekable byte stream with 64-bit offsets.
///
/// Everything a demuxer needs from its input: sequential reads, absolute
/// and relative seeks, the current position, and the total size.
pub trait MediaStream: Read + Seek {
    /// Current byte position in the stream.
    fn tell(&mut self) -> std::io::Result<u64> {
        self.stream_position()
    }

    /// Total size of the stream in bytes.
    ///
    /// Implemented by seeking to the end and back; demuxers call this once
    /// at open and cache the result.
    fn len(&mut self) -> std::io::Result<u64> {
        let pos = self.stream_position()?;
        let end = self.seek(SeekFrom::End(0))?;
        self.seek(SeekFrom::Start(pos))?;
        Ok(end)
    }
}

impl<R: Read + Seek> MediaStream for R {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_tell_and_len() {
        let mut cursor = Cursor::new(vec![0u8; 100]);
        assert_eq!(cursor.tell().unwrap(), 0);
        assert_eq!(cursor.len().unwrap(), 100);

        let mut buf = [0u8; 10];
        cursor.read_exact(&mut buf).unwrap();
        assert_eq!(cursor.tell().unwrap(), 10);
        // len() must not move the position
        assert_eq!(cursor.len().unwrap(), 100);
        assert_eq!(cursor.tell().unwrap(), 10);
    }
}
