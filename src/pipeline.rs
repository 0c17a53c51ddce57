//! One-instance pipeline construction and wiring.
//!
//! [`AudioPipeline`] owns the three frame queues, the ingest router, the
//! playback scheduler, the USB buffer manager, the engine and the monitor
//! sink; it is constructed once at startup and never duplicated. Methods are
//! grouped by the context that runs them (capture ISR, playback ISR, USB
//! endpoint ISR, USB task, host); the host's glue is responsible for calling
//! each entry point from its own context only.

use std::sync::Arc;

use tracing::info;

use crate::config::{InputSource, PipelineConfig};
use crate::engine::EnhancementEngine;
use crate::feed::UsbFeedRouter;
use crate::ingest::{CaptureFrame, IngestRouter};
use crate::playback::PlaybackScheduler;
use crate::queue::{FrameQueue, StereoQueue};
use crate::signal::FrameSignal;
use crate::sink::{MonitorChannel, MonitorSink, TxFifo};
use crate::usb::{PrebufferGate, UsbIngest};
use crate::{PipelineError, StereoFrame};

/// The pipeline's three queues. Each is single-producer/single-consumer in
/// steady state.
pub struct PipelineQueues {
    /// Capture-side staging for host glue that queues its mic ISR data
    /// instead of calling [`AudioPipeline::capture_interrupt`] directly.
    pub mic: StereoQueue,
    /// Echo-reference frames: pushed by the playback scheduler once a frame
    /// has fully played, popped by the ingest router.
    pub reference: StereoQueue,
    /// Frames destined for the output path: far-end USB audio (microphone
    /// input mode), processed engine output (USB input mode), or the
    /// calibration mirror.
    pub playback: StereoQueue,
}

pub struct AudioPipeline<E, S> {
    config: PipelineConfig,
    queues: Arc<PipelineQueues>,
    gate: Arc<PrebufferGate>,
    signal: Arc<FrameSignal>,
    ingest: IngestRouter,
    playback: PlaybackScheduler,
    usb: UsbIngest,
    feed: UsbFeedRouter,
    engine: E,
    monitor: S,
}

impl<E: EnhancementEngine, S: MonitorSink> AudioPipeline<E, S> {
    /// Construct and wire the whole pipeline. Initializes the engine for the
    /// configured channel count; an engine init failure aborts bring-up.
    pub fn new(config: PipelineConfig, mut engine: E, monitor: S) -> Result<Self, PipelineError> {
        if config.queue_capacity == 0 {
            return Err(PipelineError::InvalidQueueCapacity);
        }
        engine.init(config.channels.channel_count())?;

        let gate = Arc::new(PrebufferGate::new());
        let playback = PlaybackScheduler::new(
            config.fifo_chunk_samples,
            config.prebuffer_frames,
            gate.clone(),
        )?;
        let queues = Arc::new(PipelineQueues {
            mic: FrameQueue::with_capacity(config.queue_capacity),
            reference: FrameQueue::with_capacity(config.queue_capacity),
            playback: FrameQueue::with_capacity(config.queue_capacity),
        });

        info!(
            input = ?config.input,
            channels = config.channels.channel_count(),
            bulk_delay_frames = config.bulk_delay_frames(),
            "audio pipeline initialized"
        );

        Ok(Self {
            ingest: IngestRouter::new(&config),
            feed: UsbFeedRouter::new(config.input),
            usb: UsbIngest::new(),
            signal: Arc::new(FrameSignal::new()),
            gate,
            playback,
            queues,
            engine,
            monitor,
            config,
        })
    }

    pub fn queues(&self) -> Arc<PipelineQueues> {
        self.queues.clone()
    }

    /// The USB frame signal, for parking a dedicated feed task on
    /// [`FrameSignal::wait`].
    pub fn frame_signal(&self) -> Arc<FrameSignal> {
        self.signal.clone()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn monitor(&self) -> &S {
        &self.monitor
    }

    pub fn is_halted(&self) -> bool {
        self.ingest.is_halted()
    }

    // --- capture ISR context ---

    /// One microphone capture delivery.
    pub fn capture_interrupt(&mut self, capture: CaptureFrame<'_>) -> Result<(), PipelineError> {
        self.ingest.feed_capture(
            capture,
            &self.queues.playback,
            &self.queues.reference,
            &mut self.engine,
            &mut self.monitor,
        )
    }

    /// Drain one frame from the mic-in queue into the router. Returns
    /// `Ok(false)` when the queue is empty.
    pub fn service_capture(&mut self) -> Result<bool, PipelineError> {
        match self.queues.mic.pop() {
            Some(frame) => {
                self.ingest.feed_capture(
                    CaptureFrame::Stereo(&frame),
                    &self.queues.playback,
                    &self.queues.reference,
                    &mut self.engine,
                    &mut self.monitor,
                )?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // --- playback ISR context ---

    /// Prime the transmit path before activating the peripheral.
    pub fn start_playback(&mut self, fifo: &mut impl TxFifo) {
        self.playback.start(fifo);
    }

    /// One playback FIFO-trigger interrupt.
    pub fn playback_interrupt(&mut self, fifo: &mut impl TxFifo) {
        self.playback
            .on_fifo_trigger(fifo, &self.queues.playback, &self.queues.reference);
    }

    // --- USB endpoint ISR context ---

    /// Stream (re)start: reset accumulation and discard stale queued frames.
    pub fn usb_stream_start(&mut self) {
        self.usb.begin_stream(
            &self.gate,
            &[
                &self.queues.playback,
                &self.queues.reference,
                &self.queues.mic,
            ],
        );
    }

    pub fn usb_stream_stop(&mut self) {
        self.usb.end_stream();
    }

    /// One isochronous packet delivery. Returns `true` when a 10 ms frame
    /// completed and was published to the frame signal.
    pub fn usb_packet(&mut self, data: &[u8]) -> bool {
        match self.usb.on_packet(data, &self.gate) {
            Some(frame) => {
                self.signal.notify(frame);
                true
            }
            None => false,
        }
    }

    // --- USB task context ---

    /// Route one assembled frame, typically obtained from
    /// `frame_signal().wait()` or [`FrameSignal::try_take`].
    pub fn usb_task_service(&mut self, frame: &StereoFrame) -> Result<(), PipelineError> {
        self.feed.route(
            frame,
            &mut self.ingest,
            &self.queues.playback,
            &self.queues.reference,
            &mut self.engine,
            &mut self.monitor,
        )
    }

    // --- host-facing operations ---

    /// Deliver the engine's processed output for this cycle: mirrored to the
    /// monitor sink when the toggle selects processed output, and pushed to
    /// the playback queue in USB-input mode (drop on full).
    pub fn deliver_processed(&mut self, frame: &StereoFrame) -> Result<(), PipelineError> {
        if self.ingest.is_halted() {
            return Err(PipelineError::LicenseExpired);
        }
        if self.config.monitor_enabled && self.ingest.monitor_processed() {
            self.monitor.put(MonitorChannel::Ch1, frame);
        }
        if self.config.input == InputSource::Usb {
            let _ = self.queues.playback.push(*frame);
        }
        Ok(())
    }

    /// Install a calibration buffer, overriding the live reference path.
    pub fn install_calibration(&mut self, samples: &[i16]) -> Result<(), PipelineError> {
        self.ingest.install_calibration(samples)
    }

    /// Return to the live USB reference path.
    pub fn clear_calibration(&mut self) {
        self.ingest.clear_calibration();
    }

    /// Toggle between processed and unprocessed monitor output.
    pub fn set_processed_monitor(&mut self, processed: bool) {
        self.ingest.set_processed_monitor(processed);
    }
}
