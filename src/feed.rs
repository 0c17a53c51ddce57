//! USB task-side frame routing.
//!
//! The endpoint interrupt assembles 10 ms frames ([`crate::usb::UsbIngest`])
//! and publishes them through [`crate::signal::FrameSignal`]; the woken task
//! hands each frame here. Routing depends on the pipeline's input source:
//! with a hardware microphone the USB stream is far-end audio looped back to
//! the device speaker, while in USB-input mode the stream itself is the
//! capture signal.

use crate::config::InputSource;
use crate::engine::EnhancementEngine;
use crate::ingest::{CaptureFrame, IngestRouter};
use crate::queue::StereoQueue;
use crate::sink::MonitorSink;
use crate::{PipelineError, StereoFrame};

pub struct UsbFeedRouter {
    input: InputSource,
}

impl UsbFeedRouter {
    pub fn new(input: InputSource) -> Self {
        Self { input }
    }

    /// Route one assembled frame onward. While a calibration buffer is
    /// installed the live USB stream is ignored entirely; the calibrator owns
    /// the reference and output paths.
    pub fn route<E: EnhancementEngine, S: MonitorSink>(
        &mut self,
        frame: &StereoFrame,
        ingest: &mut IngestRouter,
        playback_queue: &StereoQueue,
        reference_queue: &StereoQueue,
        engine: &mut E,
        monitor: &mut S,
    ) -> Result<(), PipelineError> {
        if ingest.calibration_installed() {
            return Ok(());
        }
        match self.input {
            InputSource::Microphone => {
                // Speaker loopback. The playback scheduler republishes the
                // played frame as the echo reference; drop on full.
                let _ = playback_queue.push(*frame);
                Ok(())
            }
            InputSource::Usb => ingest.feed_capture(
                CaptureFrame::Stereo(frame),
                playback_queue,
                reference_queue,
                engine,
                monitor,
            ),
        }
    }
}
