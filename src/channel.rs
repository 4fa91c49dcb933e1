//! Length-prefixed frame channel.
//!
//! Both directions of the simulator link use the same framing: a 4-byte
//! little-endian length followed by exactly that many payload bytes. There
//! is no message-type byte and no checksum; direction alone decides whether
//! a payload is an image or a command string.
//!
//! Reads loop until the declared amount is satisfied. A zero-length read
//! before that point means the peer closed the connection.

use std::io::{ErrorKind, Read, Write};

use thiserror::Error;

/// Upper bound on a declared payload length. Anything larger is treated as
/// a protocol violation rather than an allocation request.
pub const MAX_FRAME_BYTES: u32 = 64 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ChannelError {
    /// The peer closed the connection, or an I/O deadline expired.
    #[error("connection closed by peer")]
    ConnectionClosed,
    /// A declared length exceeded [`MAX_FRAME_BYTES`].
    #[error("declared frame length {0} exceeds maximum {MAX_FRAME_BYTES}")]
    FrameTooLarge(u64),
    #[error("stream error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bidirectional frame channel over any byte stream.
pub struct FrameChannel<S> {
    stream: S,
}

impl<S: Read + Write> FrameChannel<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Write one frame: 4-byte length prefix, then the payload.
    pub fn send_frame(&mut self, payload: &[u8]) -> Result<(), ChannelError> {
        let len = u64::try_from(payload.len()).unwrap_or(u64::MAX);
        if len > u64::from(MAX_FRAME_BYTES) {
            return Err(ChannelError::FrameTooLarge(len));
        }
        let prefix = (len as u32).to_le_bytes();
        self.stream.write_all(&prefix).map_err(map_io)?;
        self.stream.write_all(payload).map_err(map_io)?;
        self.stream.flush().map_err(map_io)?;
        Ok(())
    }

    /// Read one frame, looping over partial reads of both the prefix and
    /// the payload.
    pub fn recv_frame(&mut self) -> Result<Vec<u8>, ChannelError> {
        let mut prefix = [0u8; 4];
        self.read_full(&mut prefix)?;
        let len = u32::from_le_bytes(prefix);
        if len > MAX_FRAME_BYTES {
            return Err(ChannelError::FrameTooLarge(u64::from(len)));
        }
        let mut payload = vec![0u8; len as usize];
        self.read_full(&mut payload)?;
        Ok(payload)
    }

    fn read_full(&mut self, buf: &mut [u8]) -> Result<(), ChannelError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.stream.read(&mut buf[filled..]) {
                Ok(0) => return Err(ChannelError::ConnectionClosed),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(map_io(e)),
            }
        }
        Ok(())
    }
}

/// Deadline expiry counts as a closed connection for session purposes.
fn map_io(e: std::io::Error) -> ChannelError {
    match e.kind() {
        ErrorKind::TimedOut | ErrorKind::WouldBlock => ChannelError::ConnectionClosed,
        ErrorKind::UnexpectedEof | ErrorKind::BrokenPipe | ErrorKind::ConnectionReset => {
            ChannelError::ConnectionClosed
        }
        _ => ChannelError::Io(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// In-memory stream that delivers reads in fixed-size chunks.
    struct ChunkedStream {
        input: Vec<u8>,
        pos: usize,
        output: Vec<u8>,
        chunk: usize,
    }

    impl ChunkedStream {
        fn new(input: Vec<u8>, chunk: usize) -> Self {
            Self {
                input,
                pos: 0,
                output: Vec::new(),
                chunk,
            }
        }
    }

    impl Read for ChunkedStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let remaining = &self.input[self.pos..];
            let n = remaining.len().min(buf.len()).min(self.chunk);
            buf[..n].copy_from_slice(&remaining[..n]);
            self.pos += n;
            Ok(n)
        }
    }

    impl Write for ChunkedStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn framed(payload: &[u8]) -> Vec<u8> {
        let mut channel = FrameChannel::new(ChunkedStream::new(Vec::new(), usize::MAX));
        channel.send_frame(payload).unwrap();
        channel.into_inner().output
    }

    #[test]
    fn send_writes_little_endian_prefix() {
        let bytes = framed(b"hello");
        assert_eq!(&bytes[..4], &5u32.to_le_bytes());
        assert_eq!(&bytes[4..], b"hello");
    }

    #[test]
    fn round_trip_single_read() {
        let bytes = framed(b"payload bytes");
        let mut channel = FrameChannel::new(ChunkedStream::new(bytes, usize::MAX));
        assert_eq!(channel.recv_frame().unwrap(), b"payload bytes");
    }

    #[test]
    fn round_trip_one_byte_reads() {
        let bytes = framed(&[0u8, 1, 2, 254, 255]);
        let mut channel = FrameChannel::new(ChunkedStream::new(bytes, 1));
        assert_eq!(channel.recv_frame().unwrap(), vec![0u8, 1, 2, 254, 255]);
    }

    #[test]
    fn round_trip_empty_payload() {
        let bytes = framed(b"");
        let mut channel = FrameChannel::new(ChunkedStream::new(bytes, 1));
        assert_eq!(channel.recv_frame().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn truncated_prefix_is_connection_closed() {
        let mut channel = FrameChannel::new(ChunkedStream::new(vec![9, 0], 1));
        assert!(matches!(
            channel.recv_frame(),
            Err(ChannelError::ConnectionClosed)
        ));
    }

    #[test]
    fn truncated_payload_is_connection_closed() {
        let mut bytes = 10u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"abc");
        let mut channel = FrameChannel::new(ChunkedStream::new(bytes, 2));
        assert!(matches!(
            channel.recv_frame(),
            Err(ChannelError::ConnectionClosed)
        ));
    }

    #[test]
    fn oversized_declared_length_rejected() {
        let bytes = u32::MAX.to_le_bytes().to_vec();
        let mut channel = FrameChannel::new(ChunkedStream::new(bytes, usize::MAX));
        assert!(matches!(
            channel.recv_frame(),
            Err(ChannelError::FrameTooLarge(_))
        ));
    }
}
