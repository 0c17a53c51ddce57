//! Mic/reference ingest router.
//!
//! One call per capture delivery, from either the hardware microphone path or
//! the USB frame-assembly task. Each call produces exactly one pair
//! `(audio_frame, reference_or_none)` for the enhancement engine. A missing
//! reference never stalls the mic path; it is valid input meaning "no echo
//! cancellation this frame".

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{error, info, warn};

use crate::calib::Calibration;
use crate::config::{ChannelMode, PipelineConfig};
use crate::engine::{EnhancementEngine, FeedStatus};
use crate::pcm;
use crate::queue::StereoQueue;
use crate::sink::{MonitorChannel, MonitorSink};
use crate::{MonoFrame, PipelineError, StereoFrame, FRAME_SAMPLES, SILENT_STEREO_FRAME};

/// One capture delivery, in the layout the capture source produces.
#[derive(Clone, Copy)]
pub enum CaptureFrame<'a> {
    Mono(&'a MonoFrame),
    /// Interleaved stereo.
    Stereo(&'a StereoFrame),
}

/// Two same-sized conversion slots plus an index toggled exactly once per
/// acquire. The slot handed out by the previous acquire is never the slot
/// handed out by the next one, so an in-flight consumer of the previous
/// frame never observes the current conversion.
pub(crate) struct PingPongPair {
    slots: [StereoFrame; 2],
    next: AtomicUsize,
}

impl PingPongPair {
    fn new() -> Self {
        Self {
            slots: [SILENT_STEREO_FRAME; 2],
            next: AtomicUsize::new(0),
        }
    }

    /// Toggle, then hand out the slot selected before the toggle.
    fn acquire(&mut self) -> &mut StereoFrame {
        let index = self.next.fetch_xor(1, Ordering::AcqRel);
        &mut self.slots[index]
    }
}

pub struct IngestRouter {
    pingpong: PingPongPair,
    /// Scratch for the downmixed/calibration reference handed to the engine.
    reference: MonoFrame,
    /// Scratch for the mono→interleaved calibration mirror.
    mirror: StereoFrame,
    calibration: Option<Calibration>,
    bulk_delay_frames: usize,
    channels: ChannelMode,
    reference_in_right_channel: bool,
    monitor_enabled: bool,
    /// Processed/unprocessed toggle: `false` mirrors the raw pre-engine frame
    /// to the monitor sink (unprocessed passthrough).
    monitor_processed: bool,
    halted: bool,
}

impl IngestRouter {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            pingpong: PingPongPair::new(),
            reference: [0; FRAME_SAMPLES],
            mirror: SILENT_STEREO_FRAME,
            calibration: None,
            bulk_delay_frames: config.bulk_delay_frames(),
            channels: config.channels,
            reference_in_right_channel: config.reference_in_right_channel,
            monitor_enabled: config.monitor_enabled,
            monitor_processed: true,
            halted: false,
        }
    }

    /// Install a calibration buffer, overriding the live reference path.
    pub fn install_calibration(&mut self, samples: &[i16]) -> Result<(), PipelineError> {
        let calibration = Calibration::new(samples)?;
        info!(
            frames = calibration.frame_count(),
            "bulk-delay calibration installed"
        );
        self.calibration = Some(calibration);
        Ok(())
    }

    /// Return to the live USB reference path.
    pub fn clear_calibration(&mut self) {
        self.calibration = None;
    }

    pub fn calibration_installed(&self) -> bool {
        self.calibration.is_some()
    }

    /// Select what the monitor sink carries: the engine's processed output
    /// (`true`, default) or the raw unprocessed capture (`false`).
    pub fn set_processed_monitor(&mut self, processed: bool) {
        self.monitor_processed = processed;
    }

    pub fn monitor_processed(&self) -> bool {
        self.monitor_processed
    }

    /// Terminal state reached after the engine reports license exhaustion.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Route one capture delivery to the engine.
    ///
    /// Reference resolution, layout conversion into the ping-pong pair (the
    /// toggle happens exactly once per call, whatever the reference outcome)
    /// and the passthrough monitor mirror all happen here; see the module
    /// docs for the pairing contract.
    pub fn feed_capture<E: EnhancementEngine, S: MonitorSink>(
        &mut self,
        capture: CaptureFrame<'_>,
        playback_queue: &StereoQueue,
        reference_queue: &StereoQueue,
        engine: &mut E,
        monitor: &mut S,
    ) -> Result<(), PipelineError> {
        if self.halted {
            return Err(PipelineError::LicenseExpired);
        }

        let right_channel_reference =
            self.reference_in_right_channel && matches!(capture, CaptureFrame::Stereo(_));

        // Resolve the reference source: calibration buffer when installed,
        // otherwise the live queue (unless the right channel carries it).
        let mut have_reference = false;
        if let Some(calibration) = self.calibration.as_mut() {
            self.reference = *calibration.next_frame();
            // Emit the calibration tone on the output path so the acoustic
            // round trip is externally measurable.
            pcm::mono_to_interleaved(&self.reference, &mut self.mirror);
            let _ = playback_queue.push(self.mirror);
            have_reference = true;
        } else if !right_channel_reference {
            if let Some(frame) = pop_reference(reference_queue, self.bulk_delay_frames) {
                pcm::interleaved_to_mono(&frame, &mut self.reference);
                have_reference = true;
            }
        }

        // The toggle is unconditional: one acquire per capture delivery.
        let slot = self.pingpong.acquire();

        let audio: &[i16] = match capture {
            CaptureFrame::Stereo(raw) => {
                debug_assert_eq!(self.channels, ChannelMode::Stereo);
                pcm::interleaved_to_planar(raw, slot);
                &slot[..]
            }
            CaptureFrame::Mono(raw) => {
                debug_assert_eq!(self.channels, ChannelMode::Mono);
                &raw[..]
            }
        };

        if right_channel_reference {
            // Quality-benchmark stream: left channel is audio+echo, right
            // channel is the echo reference.
            self.reference.copy_from_slice(&audio[FRAME_SAMPLES..]);
            have_reference = true;
        }

        // Unprocessed passthrough: mirror the engine-bound frame before
        // enhancement. Never alters what is fed to the engine.
        if self.monitor_enabled && !self.monitor_processed {
            monitor.put(MonitorChannel::Ch1, audio);
        }

        let reference = if have_reference {
            Some(&self.reference)
        } else {
            None
        };

        match engine.feed(audio, reference) {
            FeedStatus::Ok => Ok(()),
            FeedStatus::Recoverable => {
                warn!("enhancement engine rejected a frame; skipping this cycle");
                Ok(())
            }
            FeedStatus::LicenseExpired => {
                self.halted = true;
                error!("enhancement engine license expired; pipeline halted");
                Err(PipelineError::LicenseExpired)
            }
        }
    }
}

/// Pop one reference frame while holding `depth` frames back, so the
/// reference lags the newest completed frame by the configured bulk delay.
/// Backlog beyond `depth + 1` is skipped; an empty (or still-filling) queue
/// yields no reference rather than blocking.
fn pop_reference(queue: &StereoQueue, depth: usize) -> Option<StereoFrame> {
    while queue.len() > depth + 1 {
        let _ = queue.pop();
    }
    if queue.len() > depth {
        queue.pop()
    } else {
        None
    }
}
