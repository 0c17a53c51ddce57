//! Voicebridge: a cross-clock-domain audio frame pipeline.
//!
//! Three independently clocked real-time sources — a microphone capture
//! interrupt, a playback-peripheral interrupt and a USB isochronous audio
//! interrupt — are bridged into a single fixed-rate 10 ms frame pipeline that
//! feeds an external enhancement engine and returns processed audio to the
//! output path, while keeping a time-aligned echo-reference signal available
//! to that engine.
//!
//! The crate is written sans-io: every "interrupt handler" is a plain method
//! on an owned state struct, and the host's ISR/task glue decides when each
//! one runs. Hardware FIFO access, the USB protocol engine and the engine's
//! signal processing live behind small traits ([`sink::TxFifo`],
//! [`engine::EnhancementEngine`], [`sink::MonitorSink`]).
//!
//! Flow-control contract, in one paragraph: interrupt-context methods never
//! block, never allocate and never wait. Queue underflow degrades to silence
//! or a skipped cycle; queue overflow drops the new frame and preserves what
//! is queued. The only suspension point in the whole pipeline is
//! [`signal::FrameSignal::wait`], used by the USB frame-assembly task.

pub mod calib;
pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod ingest;
pub mod pcm;
pub mod pipeline;
pub mod playback;
pub mod queue;
pub mod signal;
pub mod sink;
pub mod usb;

/// Operating sample rate of the pipeline.
pub const SAMPLE_RATE_HZ: u32 = 16_000;

/// Frame period. All queues and buffers operate on 10 ms slices.
pub const FRAME_PERIOD_MS: u32 = 10;

/// Mono samples per 10 ms frame.
pub const FRAME_SAMPLES: usize = 160;

/// Interleaved-stereo samples per 10 ms frame.
pub const STEREO_FRAME_SAMPLES: usize = 2 * FRAME_SAMPLES;

/// Bytes per 10 ms interleaved-stereo frame (16-bit samples).
///
/// This is the USB accumulation threshold: 1 ms isochronous packets are
/// collected until exactly this many bytes have arrived.
pub const STEREO_FRAME_BYTES: usize = STEREO_FRAME_SAMPLES * 2;

/// One 10 ms mono frame.
pub type MonoFrame = [i16; FRAME_SAMPLES];

/// One 10 ms stereo frame. Interleaved (L0 R0 L1 R1 ...) or planar
/// (L0..L159 R0..R159) depending on context; conversions live in [`pcm`].
pub type StereoFrame = [i16; STEREO_FRAME_SAMPLES];

/// All-zero stereo frame, substituted wherever a queue runs dry.
pub const SILENT_STEREO_FRAME: StereoFrame = [0; STEREO_FRAME_SAMPLES];

pub use config::{ChannelMode, InputSource, PipelineConfig};
pub use engine::{EnhancementEngine, FeedStatus};
pub use error::PipelineError;
pub use pipeline::AudioPipeline;
pub use queue::{FrameQueue, PushStatus, StereoQueue};
pub use sink::{MonitorChannel, MonitorSink, TxFifo};
