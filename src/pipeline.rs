//! Per-frame command derivation.
//!
//! One pipeline instance composes a detector backend, a selection strategy,
//! the smoother, and the zone controller, and owns the mutable track state.
//! Every received payload produces exactly one command.

use thiserror::Error;

use crate::command::Command;
use crate::detect::{Candidate, DetectorBackend};
use crate::frame::DecodedFrame;
use crate::select::SelectionStrategy;
use crate::track::{Smoother, TrackState};
use crate::zone::ZoneController;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The backend failed to run. Reported per frame so the caller can
    /// choose between retrying and aborting the session.
    #[error("detector '{name}' unavailable: {source}")]
    DetectorUnavailable {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

pub struct FollowerPipeline {
    backend: Box<dyn DetectorBackend>,
    strategy: SelectionStrategy,
    smoother: Smoother,
    zones: ZoneController,
    state: TrackState,
    min_confidence: f64,
}

impl FollowerPipeline {
    pub fn new(
        backend: Box<dyn DetectorBackend>,
        strategy: SelectionStrategy,
        smoother: Smoother,
        zones: ZoneController,
        min_confidence: f64,
    ) -> Self {
        Self {
            backend,
            strategy,
            smoother,
            zones,
            state: TrackState::new(),
            min_confidence,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn warm_up(&mut self) -> anyhow::Result<()> {
        self.backend.warm_up()
    }

    /// Turn one wire payload into one command.
    ///
    /// An undecodable payload is skipped with the neutral command; a
    /// detector failure is surfaced as [`PipelineError::DetectorUnavailable`].
    pub fn process(&mut self, payload: &[u8]) -> Result<Command, PipelineError> {
        let Some(frame) = DecodedFrame::from_wire(payload) else {
            log::debug!("skipping undecodable payload ({} bytes)", payload.len());
            return Ok(Command::neutral());
        };

        let raw = self.backend.detect(&frame).map_err(|source| {
            PipelineError::DetectorUnavailable {
                name: self.backend.name(),
                source,
            }
        })?;

        let candidates: Vec<Candidate> = raw
            .into_iter()
            .filter(|c| c.confidence >= self.min_confidence)
            .map(|mut c| {
                c.bbox = c.bbox.clamp_to(frame.width(), frame.height());
                c
            })
            .collect();

        let selected = self.strategy.select(&frame, &candidates, &mut self.state);
        let resolved = self.smoother.resolve(selected.as_ref(), &mut self.state);

        Ok(match resolved {
            Some(bbox) => self.zones.compute(&bbox, frame.width(), frame.height()),
            None => Command::neutral(),
        })
    }
}
