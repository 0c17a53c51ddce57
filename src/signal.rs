//! Interrupt-to-task frame hand-off.
//!
//! [`FrameSignal::notify`] is the non-blocking task-notify issued from the
//! USB endpoint interrupt once a 10 ms frame has been assembled;
//! [`FrameSignal::wait`] is the single suspension point in the entire
//! pipeline. A new notify before the task has collected the previous frame
//! simply replaces it (latest frame wins).

use parking_lot::{Condvar, Mutex};

use crate::StereoFrame;

#[derive(Default)]
pub struct FrameSignal {
    slot: Mutex<Option<StereoFrame>>,
    ready: Condvar,
}

impl FrameSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an assembled frame and wake the waiting task. Never blocks.
    pub fn notify(&self, frame: StereoFrame) {
        *self.slot.lock() = Some(frame);
        self.ready.notify_one();
    }

    /// Suspend until a frame arrives. Cancellation mid-wait is not supported;
    /// a new notify simply wakes the waiter.
    pub fn wait(&self) -> StereoFrame {
        let mut slot = self.slot.lock();
        loop {
            if let Some(frame) = slot.take() {
                return frame;
            }
            self.ready.wait(&mut slot);
        }
    }

    /// Non-blocking collect, for hosts that poll instead of parking a task.
    pub fn try_take(&self) -> Option<StereoFrame> {
        self.slot.lock().take()
    }
}
