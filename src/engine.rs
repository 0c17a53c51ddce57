//! Enhancement-engine boundary.
//!
//! The engine's internals (noise suppression, echo cancellation) are opaque;
//! this trait is intentionally small so the pipeline can be bridged to a real
//! vendor engine, a software implementation, or the in-memory fakes used by
//! the tests.

use crate::{MonoFrame, PipelineError};

/// Per-frame outcome of a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// Frame accepted.
    Ok,
    /// Frame rejected; the pipeline logs and skips this cycle.
    Recoverable,
    /// Entitlement exhausted. Fatal: the pipeline halts permanently rather
    /// than emit unlicensed output.
    LicenseExpired,
}

pub trait EnhancementEngine {
    /// Prepare the engine for `channels` input channels (1 or 2). Called once
    /// at pipeline construction; failure aborts bring-up.
    fn init(&mut self, channels: usize) -> Result<(), PipelineError>;

    /// Consume one capture frame and its optional echo reference.
    ///
    /// `audio` is one 10 ms frame: 160 mono samples or 320 planar-stereo
    /// samples, matching the channel count given to [`init`](Self::init).
    /// `reference` is absent whenever no reference frame was available this
    /// cycle; that is valid input meaning "no echo cancellation this frame".
    fn feed(&mut self, audio: &[i16], reference: Option<&MonoFrame>) -> FeedStatus;
}
