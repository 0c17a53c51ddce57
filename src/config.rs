//! Pipeline configuration.
//!
//! Input source and channel mode are plain values consumed once, at
//! construction; none of the interrupt paths re-reads configuration.

use crate::FRAME_PERIOD_MS;

/// Where capture frames come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// A hardware microphone drives [`AudioPipeline::capture_interrupt`];
    /// the USB stream is far-end audio routed to the playback queue.
    ///
    /// [`AudioPipeline::capture_interrupt`]: crate::AudioPipeline::capture_interrupt
    Microphone,
    /// The USB stream itself is the capture signal; each assembled 10 ms
    /// frame is fed straight to the ingest router.
    Usb,
}

/// Channel layout of the capture signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    Mono,
    Stereo,
}

impl ChannelMode {
    pub fn channel_count(self) -> usize {
        match self {
            ChannelMode::Mono => 1,
            ChannelMode::Stereo => 2,
        }
    }
}

/// Build-time configuration, fixed for the life of the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: InputSource,
    pub channels: ChannelMode,
    /// Acoustic bulk delay in milliseconds, coarse-quantized to the 10 ms
    /// frame period. The reference pop lags the newest completed frame by
    /// `bulk_delay_ms / 10` frames.
    pub bulk_delay_ms: u32,
    /// Enables the fire-and-forget monitor mirror.
    pub monitor_enabled: bool,
    /// Completed USB frames required before playback starts popping.
    pub prebuffer_frames: u32,
    /// Quality-benchmark mode: in stereo USB input, the right channel of the
    /// capture frame carries the echo reference and the live reference queue
    /// is bypassed.
    pub reference_in_right_channel: bool,
    /// Capacity, in frames, of each of the three pipeline queues.
    pub queue_capacity: usize,
    /// Samples per playback-FIFO chunk; must divide the 320-sample frame.
    pub fifo_chunk_samples: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: InputSource::Microphone,
            channels: ChannelMode::Stereo,
            bulk_delay_ms: 0,
            monitor_enabled: true,
            prebuffer_frames: 2,
            reference_in_right_channel: false,
            queue_capacity: 8,
            fifo_chunk_samples: 64,
        }
    }
}

impl PipelineConfig {
    /// Bulk delay expressed in whole frame periods.
    pub fn bulk_delay_frames(&self) -> usize {
        (self.bulk_delay_ms / FRAME_PERIOD_MS) as usize
    }
}
