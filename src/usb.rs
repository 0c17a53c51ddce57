//! USB ingest buffer manager, endpoint-interrupt side.
//!
//! The USB audio class delivers roughly 1 ms of interleaved stereo per
//! isochronous packet. [`UsbIngest::on_packet`] accumulates those packets
//! into a 10 ms frame using two alternating halves: the half being filled is
//! never the half last handed out, and a completed frame is snapshotted and
//! the halves swapped *before* the frame-ready event is returned, so the
//! task side can never observe a half-written buffer.

use std::sync::atomic::{AtomicU32, Ordering};

use tracing::info;

use crate::queue::StereoQueue;
use crate::{StereoFrame, STEREO_FRAME_BYTES, STEREO_FRAME_SAMPLES};

/// Count of completed USB frames since stream start, gating playback.
///
/// Incremented only by the USB endpoint interrupt; reset only by the playback
/// interrupt (on underrun) and by stream restart. Each transition kind has
/// exactly one writing context.
#[derive(Default)]
pub struct PrebufferGate(AtomicU32);

impl PrebufferGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }

    pub fn level(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Accumulation state for the USB endpoint callback.
pub struct UsbIngest {
    halves: [[u8; STEREO_FRAME_BYTES]; 2],
    /// Active-half selector: the half packets are currently written into.
    active: usize,
    /// Bytes of the current frame received so far. Reset to zero exactly on
    /// frame completion and on stream (re)start.
    fill: usize,
    streaming: bool,
}

impl UsbIngest {
    pub fn new() -> Self {
        Self {
            halves: [[0; STEREO_FRAME_BYTES]; 2],
            active: 0,
            fill: 0,
            streaming: false,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Stream (re)start: select the first half, clear the counters, and
    /// discard stale frames from a prior session. The host does not always
    /// see an explicit USB stop, so restart must be self-cleaning.
    pub fn begin_stream(&mut self, gate: &PrebufferGate, queues: &[&StereoQueue]) {
        self.active = 0;
        self.fill = 0;
        self.streaming = true;
        gate.reset();
        for queue in queues {
            queue.flush();
        }
        info!("usb audio stream started; queues flushed");
    }

    pub fn end_stream(&mut self) {
        self.streaming = false;
    }

    /// One isochronous packet delivery. Returns the assembled frame when this
    /// packet completes a 10 ms accumulation, `None` otherwise.
    ///
    /// Interrupt-context: no blocking, no allocation. Bytes beyond the frame
    /// bound within a single packet are discarded (the write never exceeds
    /// the accumulation buffer).
    pub fn on_packet(&mut self, data: &[u8], gate: &PrebufferGate) -> Option<StereoFrame> {
        if !self.streaming || data.is_empty() {
            return None;
        }

        let take = data.len().min(STEREO_FRAME_BYTES - self.fill);
        self.halves[self.active][self.fill..self.fill + take].copy_from_slice(&data[..take]);
        self.fill += take;

        if self.fill < STEREO_FRAME_BYTES {
            return None;
        }

        self.fill = 0;
        gate.increment();
        // Snapshot, then swap, then hand off; the next packet lands in the
        // other half while the task still holds this frame.
        let frame = frame_from_le_bytes(&self.halves[self.active]);
        self.active ^= 1;
        Some(frame)
    }
}

impl Default for UsbIngest {
    fn default() -> Self {
        Self::new()
    }
}

fn frame_from_le_bytes(bytes: &[u8; STEREO_FRAME_BYTES]) -> StereoFrame {
    let mut frame = [0i16; STEREO_FRAME_SAMPLES];
    for (sample, pair) in frame.iter_mut().zip(bytes.chunks_exact(2)) {
        *sample = i16::from_le_bytes([pair[0], pair[1]]);
    }
    frame
}
