// ABOUTME: Buffered transport halves for UCP frame I/O over any async byte stream
// ABOUTME: Reads until the end-of-frame marker and writes each frame as one flushed unit

use crate::codec::{ETX, PDU_LEN_MINUS_DATA};
use bytes::{Buf, Bytes, BytesMut};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};

/// Largest frame the five digit length field can describe, plus markers
/// and checksum.
const MAX_FRAME_LEN: usize = 99_999 + PDU_LEN_MINUS_DATA;

/// Read half of a UCP connection.
///
/// Frames are delimited by the ETX byte; everything up to and including it
/// is handed out as one raw frame. Decoding is left to the caller so a
/// malformed frame never poisons the stream.
#[derive(Debug)]
pub struct FrameReader<R> {
    stream: R,

    // Bytes received but not yet handed out as a frame.
    buffer: BytesMut,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    pub fn new(stream: R) -> Self {
        FrameReader {
            stream,
            buffer: BytesMut::with_capacity(4 * 1024),
        }
    }

    /// Read a single raw frame from the underlying stream.
    ///
    /// Returns `None` when the peer closed the stream on a frame boundary.
    /// A close in the middle of a frame is reported as `UnexpectedEof`.
    pub async fn read_frame(&mut self) -> io::Result<Option<Bytes>> {
        loop {
            if let Some(frame) = self.parse_frame()? {
                return Ok(Some(frame));
            }

            // `0` indicates "end of stream".
            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                if self.buffer.iter().all(u8::is_ascii_whitespace) {
                    self.buffer.clear();
                    return Ok(None);
                }
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed in the middle of a frame",
                ));
            }
        }
    }

    fn parse_frame(&mut self) -> io::Result<Option<Bytes>> {
        match self.buffer.iter().position(|&b| b == ETX) {
            Some(end) => Ok(Some(self.buffer.split_to(end + 1).freeze())),
            None if self.buffer.len() > MAX_FRAME_LEN => {
                let dropped = self.buffer.len();
                self.buffer.advance(dropped);
                Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("no end of frame within {dropped} bytes"),
                ))
            }
            None => Ok(None),
        }
    }
}

/// Write half of a UCP connection.
///
/// Each frame is written and flushed as one unit; callers share a writer
/// behind a mutex so two frames never interleave on the wire.
#[derive(Debug)]
pub struct FrameWriter<W: AsyncWrite> {
    stream: BufWriter<W>,
    closed: bool,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    pub fn new(stream: W) -> Self {
        FrameWriter {
            stream: BufWriter::new(stream),
            closed: false,
        }
    }

    /// Write one encoded frame and flush it to the socket
    pub async fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "connection already closed",
            ));
        }

        self.stream.write_all(frame).await?;
        self.stream.flush().await
    }

    /// Shut the write side down. Later writes fail with `NotConnected`.
    ///
    /// Every completed `write_frame` has already been flushed, so anything
    /// still buffered is the tail of an interrupted frame. It is discarded
    /// instead of flushed, which would block on a peer that stopped reading.
    pub async fn shutdown(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.stream.get_mut().shutdown().await
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
