//! Follower client: the command half of a remote visual-servoing loop.
//!
//! The simulator server streams camera frames over a single TCP connection
//! using a 4-byte length prefix per message. For every frame this client
//! runs a person detector, picks at most one candidate, smooths over
//! detection dropouts, converts the resulting box into a two-axis motion
//! command, and sends the command string back on the same connection.
//!
//! # Module Structure
//!
//! - `channel`: length-prefixed framing over a byte stream
//! - `frame`: decoding wire payloads into RGB frames
//! - `detect`: detector backend trait, registry, and the stub backend
//! - `select`: per-frame target-selection strategies
//! - `track`: cross-frame state and dropout smoothing
//! - `zone`: dead-band arithmetic producing axis offsets
//! - `command`: the `"<axis>|<axis>"` wire string codec
//! - `pipeline`: composition of the above, one command per frame
//! - `session`: the blocking recv/process/send loop
//! - `config`: file + env configuration surface

pub mod channel;
pub mod command;
pub mod config;
pub mod detect;
pub mod frame;
pub mod pipeline;
pub mod select;
pub mod session;
pub mod track;
pub mod zone;

pub use channel::{ChannelError, FrameChannel, MAX_FRAME_BYTES};
pub use command::{AxisResult, Command, MalformedCommand, DISTANCE_LABEL, NEUTRAL_COMMAND};
pub use config::{FollowerConfig, StrategyKind};
pub use detect::{BackendRegistry, BoundingBox, Candidate, DetectorBackend, StubBackend, TrackId};
pub use frame::DecodedFrame;
pub use pipeline::{FollowerPipeline, PipelineError};
pub use select::{HsvRange, SelectionStrategy};
pub use session::Session;
pub use track::{Smoother, TrackState};
pub use zone::{ZoneBounds, ZoneController};
