//! Blocking client session against the simulator server.
//!
//! Strictly synchronous request/response: block for the next image frame,
//! derive one command, send it, repeat. Frame pacing is the server's job,
//! so there is no local worker pool and no overlap between cycles. A
//! cancellation flag is polled once per cycle; it never interrupts an
//! in-flight receive.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::channel::{ChannelError, FrameChannel};
use crate::command::Command;
use crate::pipeline::{FollowerPipeline, PipelineError};

pub struct Session<S> {
    channel: FrameChannel<S>,
    pipeline: FollowerPipeline,
    cancel: Arc<AtomicBool>,
}

impl Session<TcpStream> {
    /// Connect to the server and apply optional read/write deadlines.
    /// Deadline expiry surfaces as a closed connection.
    pub fn connect(
        addr: &str,
        io_timeout: Option<Duration>,
        pipeline: FollowerPipeline,
        cancel: Arc<AtomicBool>,
    ) -> Result<Self> {
        let stream =
            TcpStream::connect(addr).with_context(|| format!("failed to connect to {}", addr))?;
        stream.set_read_timeout(io_timeout)?;
        stream.set_write_timeout(io_timeout)?;
        log::info!("connected to server at {}", addr);
        Ok(Self::new(stream, pipeline, cancel))
    }
}

impl<S: Read + Write> Session<S> {
    pub fn new(stream: S, pipeline: FollowerPipeline, cancel: Arc<AtomicBool>) -> Self {
        Self {
            channel: FrameChannel::new(stream),
            pipeline,
            cancel,
        }
    }

    /// Run until the peer closes the connection, cancellation is requested,
    /// or an I/O error occurs. The stream is dropped on every exit path.
    pub fn run(mut self) -> Result<()> {
        let mut frames = 0u64;
        loop {
            if self.cancel.load(Ordering::SeqCst) {
                log::info!("cancellation requested, ending session after {} frames", frames);
                return Ok(());
            }

            let payload = match self.channel.recv_frame() {
                Ok(payload) => payload,
                Err(ChannelError::ConnectionClosed) => {
                    log::info!("connection closed by server after {} frames", frames);
                    return Ok(());
                }
                Err(e) => return Err(e).context("receiving frame"),
            };
            frames += 1;

            let command = match self.pipeline.process(&payload) {
                Ok(command) => command,
                Err(e @ PipelineError::DetectorUnavailable { .. }) => {
                    // Keep the one-command-per-frame contract; a supervisor
                    // decides whether a persistently failing detector is
                    // worth aborting for.
                    log::warn!("{}, answering with neutral command", e);
                    Command::neutral()
                }
            };

            let encoded = command.encode();
            log::debug!("frame #{} ({} bytes) -> {}", frames, payload.len(), encoded);

            match self.channel.send_frame(encoded.as_bytes()) {
                Ok(()) => {}
                Err(ChannelError::ConnectionClosed) => {
                    log::info!("connection closed by server while sending command");
                    return Ok(());
                }
                Err(e) => return Err(e).context("sending command"),
            }
        }
    }
}
