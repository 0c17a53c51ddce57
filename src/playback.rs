//! Playback frame scheduler.
//!
//! Interrupt-driven consumer of the playback queue. Each FIFO-trigger
//! interrupt writes exactly one hardware-FIFO-sized chunk into the transmit
//! path; a 10 ms frame is drained across several interrupts. When a frame
//! finishes playing it is republished into the echo-reference queue, which
//! makes the playback path double as the reference source when no dedicated
//! acoustic reference path exists.

use std::sync::Arc;

use crate::queue::StereoQueue;
use crate::sink::TxFifo;
use crate::usb::PrebufferGate;
use crate::{PipelineError, StereoFrame, SILENT_STEREO_FRAME, STEREO_FRAME_SAMPLES};

pub struct PlaybackScheduler {
    frame: StereoFrame,
    /// Sub-frame counter: chunks of the current frame already written.
    chunk: usize,
    chunk_samples: usize,
    chunks_per_frame: usize,
    /// Set only when the frame at `chunk == 0` came from the queue; silence
    /// substituted on underrun is never republished as a reference.
    frame_valid: bool,
    gate: Arc<PrebufferGate>,
    prebuffer_frames: u32,
}

impl PlaybackScheduler {
    pub fn new(
        chunk_samples: usize,
        prebuffer_frames: u32,
        gate: Arc<PrebufferGate>,
    ) -> Result<Self, PipelineError> {
        if chunk_samples == 0 || STEREO_FRAME_SAMPLES % chunk_samples != 0 {
            return Err(PipelineError::InvalidChunkSize(chunk_samples));
        }
        Ok(Self {
            frame: SILENT_STEREO_FRAME,
            chunk: 0,
            chunk_samples,
            chunks_per_frame: STEREO_FRAME_SAMPLES / chunk_samples,
            frame_valid: false,
            gate,
            prebuffer_frames,
        })
    }

    pub fn chunks_per_frame(&self) -> usize {
        self.chunks_per_frame
    }

    /// Prime the transmit path with one chunk of silence and reset the
    /// sub-frame counter. Run once before the peripheral is activated.
    pub fn start<F: TxFifo>(&mut self, fifo: &mut F) {
        for _ in 0..self.chunk_samples {
            fifo.write_sample(0);
        }
        self.chunk = 0;
        self.frame_valid = false;
    }

    /// One FIFO-trigger interrupt: fetch a frame if a new one is due, write
    /// one chunk unconditionally, republish the frame once fully played.
    ///
    /// Interrupt-context: underflow degrades to silence and is not retried;
    /// overflow on the reference republish is dropped, never blocks.
    pub fn on_fifo_trigger<F: TxFifo>(
        &mut self,
        fifo: &mut F,
        playback_queue: &StereoQueue,
        reference_queue: &StereoQueue,
    ) {
        if self.chunk == 0 {
            self.frame_valid = false;
            if self.gate.level() >= self.prebuffer_frames {
                match playback_queue.pop() {
                    Some(frame) => {
                        self.frame = frame;
                        self.frame_valid = true;
                    }
                    None => {
                        // Starved: play silence and make the producer
                        // re-accumulate before the queue is trusted again.
                        self.frame = SILENT_STEREO_FRAME;
                        self.gate.reset();
                    }
                }
            } else {
                self.frame = SILENT_STEREO_FRAME;
            }
        }

        let base = self.chunk * self.chunk_samples;
        for &sample in &self.frame[base..base + self.chunk_samples] {
            fifo.write_sample(sample);
        }

        self.chunk += 1;
        if self.chunk == self.chunks_per_frame {
            self.chunk = 0;
            if self.frame_valid {
                let _ = reference_queue.push(self.frame);
                self.frame_valid = false;
            }
        }
    }
}
