//! Whole-pipeline flows in both input modes, driven the way the host's
//! ISR/task glue would drive them.

mod util;

use voicebridge::ingest::CaptureFrame;
use voicebridge::{
    AudioPipeline, InputSource, MonitorChannel, PipelineConfig, PipelineError,
    STEREO_FRAME_SAMPLES,
};

use util::{frame_bytes, stereo_ramp, CollectFifo, CollectSink, FakeEngine};

fn drain_one_frame(
    pipeline: &mut AudioPipeline<FakeEngine, CollectSink>,
    fifo: &mut CollectFifo,
    chunk_samples: usize,
) {
    for _ in 0..STEREO_FRAME_SAMPLES / chunk_samples {
        pipeline.playback_interrupt(fifo);
    }
}

#[test]
fn microphone_mode_loops_usb_audio_to_the_speaker_and_back_as_reference() {
    let config = PipelineConfig::default();
    let chunk = config.fifo_chunk_samples;
    let mut pipeline =
        AudioPipeline::new(config, FakeEngine::default(), CollectSink::default()).unwrap();
    let queues = pipeline.queues();
    let signal = pipeline.frame_signal();

    pipeline.usb_stream_start();

    // Two far-end frames arrive over USB and are routed by the feed task.
    for n in 0..2i16 {
        assert!(pipeline.usb_packet(&frame_bytes(&stereo_ramp(n))));
        let frame = signal.try_take().unwrap();
        pipeline.usb_task_service(&frame).unwrap();
    }
    assert_eq!(queues.playback.len(), 2);

    // Pre-buffer satisfied: the first frame plays and becomes the reference.
    let mut fifo = CollectFifo::default();
    pipeline.start_playback(&mut fifo);
    drain_one_frame(&mut pipeline, &mut fifo, chunk);
    assert_eq!(&fifo.samples[chunk..], &stereo_ramp(0)[..]);
    assert_eq!(queues.reference.len(), 1);

    // The next mic capture is paired with that played frame.
    pipeline
        .capture_interrupt(CaptureFrame::Stereo(&stereo_ramp(50)))
        .unwrap();
    let engine = pipeline.engine();
    assert_eq!(engine.feeds.len(), 1);
    let reference = engine.feeds[0].1.as_ref().expect("played frame not paired");
    // Downmix of the flat ramp: (s[2n] + s[2n+1]) / 2.
    assert_eq!(reference[0], (stereo_ramp(0)[0] as i32 + stereo_ramp(0)[1] as i32) as i16 / 2);

    // Processed output goes to the monitor, not back to the speaker.
    pipeline.deliver_processed(&stereo_ramp(60)).unwrap();
    assert_eq!(queues.playback.len(), 1);
    let puts = &pipeline.monitor().puts;
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].0, MonitorChannel::Ch1);
    assert_eq!(puts[0].1, &stereo_ramp(60)[..]);
}

#[test]
fn usb_mode_feeds_the_stream_as_capture_and_plays_processed_output() {
    let config = PipelineConfig {
        input: InputSource::Usb,
        prebuffer_frames: 1,
        ..PipelineConfig::default()
    };
    let chunk = config.fifo_chunk_samples;
    let mut pipeline =
        AudioPipeline::new(config, FakeEngine::default(), CollectSink::default()).unwrap();
    let queues = pipeline.queues();
    let signal = pipeline.frame_signal();

    pipeline.usb_stream_start();

    // The USB stream itself is the capture signal.
    assert!(pipeline.usb_packet(&frame_bytes(&stereo_ramp(1))));
    let frame = signal.try_take().unwrap();
    pipeline.usb_task_service(&frame).unwrap();
    assert_eq!(pipeline.engine().feeds.len(), 1);
    assert!(queues.playback.is_empty(), "capture leaked to the output path");

    // Processed output is what reaches the speaker in this mode.
    pipeline.deliver_processed(&stereo_ramp(2)).unwrap();
    assert_eq!(queues.playback.len(), 1);

    let mut fifo = CollectFifo::default();
    drain_one_frame(&mut pipeline, &mut fifo, chunk);
    assert_eq!(fifo.samples.as_slice(), &stereo_ramp(2)[..]);
    assert_eq!(queues.reference.len(), 1);

    // The played processed frame is the reference for the next capture.
    assert!(pipeline.usb_packet(&frame_bytes(&stereo_ramp(3))));
    let frame = signal.try_take().unwrap();
    pipeline.usb_task_service(&frame).unwrap();
    let reference = pipeline.engine().feeds[1].1.as_ref().expect("no reference paired");
    assert_eq!(
        reference[0],
        (stereo_ramp(2)[0] as i32 + stereo_ramp(2)[1] as i32) as i16 / 2
    );
}

#[test]
fn staged_mic_captures_are_serviced_from_the_queue() {
    let mut pipeline = AudioPipeline::new(
        PipelineConfig::default(),
        FakeEngine::default(),
        CollectSink::default(),
    )
    .unwrap();
    let queues = pipeline.queues();

    queues.mic.push(stereo_ramp(1));
    queues.mic.push(stereo_ramp(2));

    assert!(pipeline.service_capture().unwrap());
    assert!(pipeline.service_capture().unwrap());
    assert!(!pipeline.service_capture().unwrap(), "serviced an empty queue");
    assert_eq!(pipeline.engine().feeds.len(), 2);
}

#[test]
fn zero_capacity_queues_are_rejected_at_construction() {
    let config = PipelineConfig {
        queue_capacity: 0,
        ..PipelineConfig::default()
    };
    let result = AudioPipeline::new(config, FakeEngine::default(), CollectSink::default());
    assert!(matches!(result, Err(PipelineError::InvalidQueueCapacity)));
}

#[test]
fn full_playback_queue_drops_the_newest_frame() {
    let config = PipelineConfig {
        input: InputSource::Usb,
        queue_capacity: 2,
        ..PipelineConfig::default()
    };
    let mut pipeline =
        AudioPipeline::new(config, FakeEngine::default(), CollectSink::default()).unwrap();
    let queues = pipeline.queues();

    for n in 0..4i16 {
        pipeline.deliver_processed(&stereo_ramp(n)).unwrap();
    }
    // The oldest frames survive; overflow was dropped, not shifted.
    assert_eq!(queues.playback.pop(), Some(stereo_ramp(0)));
    assert_eq!(queues.playback.pop(), Some(stereo_ramp(1)));
    assert!(queues.playback.is_empty());
}
