//! Default [`BodySink`]/[`BodySource`] implementations: plain in-memory
//! buffers and thin wrappers over `std::io::Read`/`Write`.

use std::io;

use crate::traits::{BodySink, BodySource};

/// Appends every downloaded chunk to an owned `Vec<u8>`.
#[derive(Debug, Default)]
pub struct VecSink(pub Vec<u8>);

impl BodySink for VecSink {
    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.0.extend_from_slice(data);
        Ok(())
    }
}

/// Yields bytes from an owned `Vec<u8>`, advancing a cursor.
#[derive(Debug, Default)]
pub struct VecSource {
    data: Vec<u8>,
    pos: usize,
}

impl VecSource {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, pos: 0 }
    }
}

impl BodySource for VecSource {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.data[self.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

/// Adapts any `std::io::Write` into a [`BodySink`].
pub struct WriteSink<W>(pub W);

impl<W: io::Write> BodySink for WriteSink<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.0.write_all(data)
    }
}

/// Adapts any `std::io::Read` into a [`BodySource`].
pub struct ReadSource<R>(pub R);

impl<R: io::Read> BodySource for ReadSource<R> {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_accumulates_chunks() {
        let mut sink = VecSink::default();
        sink.write(b"hello ").unwrap();
        sink.write(b"world").unwrap();
        assert_eq!(sink.0, b"hello world");
    }

    #[test]
    fn vec_source_drains_then_returns_zero() {
        let mut source = VecSource::new(b"abc".to_vec());
        let mut buf = [0u8; 2];
        assert_eq!(source.fill(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"ab");
        assert_eq!(source.fill(&mut buf).unwrap(), 1);
        assert_eq!(source.fill(&mut buf).unwrap(), 0);
    }
}
