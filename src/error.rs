//! Error taxonomy.
//!
//! Only setup failures and the engine's license fatal surface as errors.
//! Transient starvation (empty queue) and overflow (full queue) are status
//! values handled in the same cycle; they are never errors and never logged
//! per occurrence.

use thiserror::Error;

use crate::{FRAME_SAMPLES, STEREO_FRAME_SAMPLES};

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The enhancement engine failed to initialize. Fatal at startup.
    #[error("enhancement engine initialization failed: {0}")]
    EngineInit(String),

    /// The engine reported license exhaustion. The pipeline has entered its
    /// terminal halted state and rejects all further operations.
    #[error("enhancement engine license expired; pipeline halted")]
    LicenseExpired,

    /// Calibration buffers must hold a whole number of frames.
    #[error(
        "calibration buffer length {0} is not a positive multiple of {frame_samples} samples",
        frame_samples = FRAME_SAMPLES
    )]
    InvalidCalibrationLength(usize),

    /// The hardware FIFO chunk must evenly divide a stereo frame.
    #[error(
        "fifo chunk of {0} samples does not divide the {stereo_frame_samples}-sample frame",
        stereo_frame_samples = STEREO_FRAME_SAMPLES
    )]
    InvalidChunkSize(usize),

    /// Queue capacity of zero frames cannot carry audio.
    #[error("queue capacity must be at least one frame")]
    InvalidQueueCapacity,
}
