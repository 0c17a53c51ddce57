//! Output-side boundary traits.
//!
//! Both traits are deliberately small so the pipeline can be bridged to
//! different backends: real peripheral/USB glue on hardware, in-memory fakes
//! in the tests.

/// Debug/monitor channels. Tuning setups expose up to four taps; the
/// functional pipeline uses channel 1 only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorChannel {
    Ch1,
    Ch2,
    Ch3,
    Ch4,
}

/// Fire-and-forget monitor sink for passthrough/tuning visibility.
///
/// Never on the processing-critical path's return value: implementations must
/// not block, and the pipeline ignores any failure to deliver.
pub trait MonitorSink {
    fn put(&mut self, channel: MonitorChannel, frame: &[i16]);
}

/// Monitor sink that discards everything.
pub struct NullSink;

impl MonitorSink for NullSink {
    fn put(&mut self, _channel: MonitorChannel, _frame: &[i16]) {}
}

/// Playback-peripheral transmit FIFO: one fixed-size write per output sample.
///
/// Interrupt status read/clear stays with the host's ISR glue; the scheduler
/// only ever writes samples.
pub trait TxFifo {
    fn write_sample(&mut self, sample: i16);
}
