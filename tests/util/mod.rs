#![allow(dead_code)]

use std::collections::VecDeque;

use voicebridge::{
    EnhancementEngine, FeedStatus, MonitorChannel, MonitorSink, MonoFrame, PipelineError,
    StereoFrame, TxFifo, STEREO_FRAME_SAMPLES,
};

/// Engine fake that records every feed and plays back a scripted status
/// sequence (default `Ok`).
#[derive(Default)]
pub struct FakeEngine {
    pub init_channels: Option<usize>,
    pub fail_init: bool,
    pub feeds: Vec<(Vec<i16>, Option<Vec<i16>>)>,
    pub script: VecDeque<FeedStatus>,
}

impl FakeEngine {
    pub fn scripted(statuses: impl IntoIterator<Item = FeedStatus>) -> Self {
        Self {
            script: statuses.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn last_reference(&self) -> Option<&Vec<i16>> {
        self.feeds.last().and_then(|(_, reference)| reference.as_ref())
    }
}

impl EnhancementEngine for FakeEngine {
    fn init(&mut self, channels: usize) -> Result<(), PipelineError> {
        if self.fail_init {
            return Err(PipelineError::EngineInit("scripted init failure".into()));
        }
        self.init_channels = Some(channels);
        Ok(())
    }

    fn feed(&mut self, audio: &[i16], reference: Option<&MonoFrame>) -> FeedStatus {
        self.feeds
            .push((audio.to_vec(), reference.map(|r| r.to_vec())));
        self.script.pop_front().unwrap_or(FeedStatus::Ok)
    }
}

/// Monitor sink that records every put.
#[derive(Default)]
pub struct CollectSink {
    pub puts: Vec<(MonitorChannel, Vec<i16>)>,
}

impl MonitorSink for CollectSink {
    fn put(&mut self, channel: MonitorChannel, frame: &[i16]) {
        self.puts.push((channel, frame.to_vec()));
    }
}

/// Transmit FIFO that records every written sample.
#[derive(Default)]
pub struct CollectFifo {
    pub samples: Vec<i16>,
}

impl TxFifo for CollectFifo {
    fn write_sample(&mut self, sample: i16) {
        self.samples.push(sample);
    }
}

/// Interleaved stereo frame with every sample set to `value`.
pub fn stereo_frame_of(value: i16) -> StereoFrame {
    [value; STEREO_FRAME_SAMPLES]
}

/// Interleaved stereo ramp frame, distinct per `seed`.
pub fn stereo_ramp(seed: i16) -> StereoFrame {
    let mut frame = [0i16; STEREO_FRAME_SAMPLES];
    for (n, s) in frame.iter_mut().enumerate() {
        *s = seed.wrapping_add(n as i16);
    }
    frame
}

/// Little-endian byte image of a stereo frame, as the USB wire carries it.
pub fn frame_bytes(frame: &StereoFrame) -> Vec<u8> {
    frame.iter().flat_map(|s| s.to_le_bytes()).collect()
}
