//! Bounded non-blocking frame queues.
//!
//! One producer context and one consumer context per queue. Push on a full
//! queue drops the new frame and leaves the queued contents untouched; pop on
//! an empty queue reports empty within one call. Nothing here ever blocks, so
//! both ends are safe to call from interrupt context.

use crossbeam::queue::ArrayQueue;

use crate::StereoFrame;

/// Outcome of a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStatus {
    /// Frame queued.
    Ok,
    /// Queue was full; the new frame was dropped, queued data preserved.
    Full,
}

/// Fixed-capacity frame queue. Lock-free; push/pop are wait-free from the
/// caller's perspective and never allocate.
pub struct FrameQueue<T> {
    inner: ArrayQueue<T>,
}

/// Queue of 10 ms interleaved-stereo frames, the pipeline's working currency.
pub type StereoQueue = FrameQueue<StereoFrame>;

impl<T> FrameQueue<T> {
    /// Create a queue holding at most `capacity` frames. Storage is allocated
    /// here, once, and never grows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: ArrayQueue::new(capacity),
        }
    }

    pub fn push(&self, frame: T) -> PushStatus {
        match self.inner.push(frame) {
            Ok(()) => PushStatus::Ok,
            Err(_) => PushStatus::Full,
        }
    }

    pub fn pop(&self) -> Option<T> {
        self.inner.pop()
    }

    /// Discard everything currently queued. Used on stream restart to drop
    /// stale frames from a prior session.
    pub fn flush(&self) {
        while self.inner.pop().is_some() {}
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }
}
