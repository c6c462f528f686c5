use crate::error::{Error, Result};
use flate2::Compression as GzLevel;
use flate2::write::GzEncoder;
use std::io::{self, Write};

/// Transport applied to everything written after the job opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Zlib,
}

enum Transport<W: Write> {
    Plain(W),
    Gzip(GzEncoder<W>),
    Closed,
}

/// Byte destination for one document.
pub struct OutputSink<W: Write> {
    transport: Transport<W>,
    written: u64,
}

impl<W: Write> OutputSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            transport: Transport::Plain(writer),
            written: 0,
        }
    }

    /// Selects the transport. Must run before the first write.
    pub fn init_compression(&mut self, compression: Compression) -> Result<()> {
        let transport = std::mem::replace(&mut self.transport, Transport::Closed);
        self.transport = match (transport, compression) {
            (Transport::Closed, _) => return Err(Error::SinkClosed),
            (Transport::Plain(w), Compression::Zlib) => {
                Transport::Gzip(GzEncoder::new(w, GzLevel::default()))
            }
            (Transport::Gzip(enc), Compression::Zlib) => Transport::Gzip(enc),
            (Transport::Gzip(enc), Compression::None) => Transport::Plain(enc.finish()?),
            (plain @ Transport::Plain(_), Compression::None) => plain,
        };
        Ok(())
    }

    /// Flushes and finalizes the transport, handing back the writer.
    pub fn fini_compression(&mut self) -> Result<W> {
        let mut writer = match std::mem::replace(&mut self.transport, Transport::Closed) {
            Transport::Plain(w) => w,
            Transport::Gzip(enc) => enc.finish()?,
            Transport::Closed => return Err(Error::SinkClosed),
        };
        writer.flush()?;
        Ok(writer)
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self.transport, Transport::Gzip(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.transport, Transport::Closed)
    }

    /// Uncompressed bytes accepted so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn fputs(&mut self, s: &str) -> Result<()> {
        if matches!(self.transport, Transport::Closed) {
            return Err(Error::SinkClosed);
        }
        self.write_all(s.as_bytes())?;
        Ok(())
    }
}

impl<W: Write> Write for OutputSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = match &mut self.transport {
            Transport::Plain(w) => w.write(buf)?,
            Transport::Gzip(enc) => enc.write(buf)?,
            Transport::Closed => {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "output sink finalized"));
            }
        };
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.transport {
            Transport::Plain(w) => w.flush(),
            Transport::Gzip(enc) => enc.flush(),
            Transport::Closed => Ok(()),
        }
    }
}

impl<W: Write> std::fmt::Debug for OutputSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let transport = match self.transport {
            Transport::Plain(_) => "plain",
            Transport::Gzip(_) => "gzip",
            Transport::Closed => "closed",
        };
        f.debug_struct("OutputSink")
            .field("transport", &transport)
            .field("written", &self.written)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn plain_passes_bytes_through() {
        let mut sink = OutputSink::new(Vec::new());
        sink.init_compression(Compression::None).unwrap();
        sink.fputs("<svg>").unwrap();
        write!(sink, "{}", 42).unwrap();
        assert_eq!(sink.bytes_written(), 7);
        let out = sink.fini_compression().unwrap();
        assert_eq!(out, b"<svg>42");
    }

    #[test]
    fn gzip_round_trips() {
        let mut sink = OutputSink::new(Vec::new());
        sink.init_compression(Compression::Zlib).unwrap();
        assert!(sink.is_compressed());
        sink.fputs("hello compressed world").unwrap();
        let out = sink.fini_compression().unwrap();
        assert_eq!(&out[..2], &[0x1f, 0x8b]);
        let mut text = String::new();
        GzDecoder::new(&out[..]).read_to_string(&mut text).unwrap();
        assert_eq!(text, "hello compressed world");
    }

    #[test]
    fn writes_after_finalize_fail() {
        let mut sink = OutputSink::new(Vec::new());
        sink.fini_compression().unwrap();
        assert!(sink.is_closed());
        assert!(matches!(sink.fputs("x"), Err(Error::SinkClosed)));
        assert!(matches!(sink.fini_compression(), Err(Error::SinkClosed)));
    }
}
