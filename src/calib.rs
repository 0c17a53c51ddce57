//! Bulk-delay calibration source.
//!
//! A pre-recorded mono buffer substituted for the live USB reference. While
//! installed it fully overrides the live reference path: every ingest cycle
//! consumes one frame at the rolling cursor and simultaneously emits the same
//! frame on the output path, so the acoustic round-trip between emission and
//! the engine's echo estimate can be measured externally.

use crate::{MonoFrame, PipelineError, FRAME_SAMPLES};

pub struct Calibration {
    frames: Box<[MonoFrame]>,
    cursor: usize,
}

impl Calibration {
    /// Install a calibration buffer. The length must be a positive multiple
    /// of the 160-sample frame; the cursor starts at offset zero.
    pub fn new(samples: &[i16]) -> Result<Self, PipelineError> {
        if samples.is_empty() || samples.len() % FRAME_SAMPLES != 0 {
            return Err(PipelineError::InvalidCalibrationLength(samples.len()));
        }
        let frames = samples
            .chunks_exact(FRAME_SAMPLES)
            .map(|chunk| {
                let mut frame = [0i16; FRAME_SAMPLES];
                frame.copy_from_slice(chunk);
                frame
            })
            .collect();
        Ok(Self { frames, cursor: 0 })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Cursor position in samples. Never reaches the buffer length: it wraps
    /// to zero the moment the final frame has been consumed.
    pub fn offset_samples(&self) -> usize {
        self.cursor * FRAME_SAMPLES
    }

    /// Consume the frame at the cursor and advance, wrapping at end-of-buffer.
    pub fn next_frame(&mut self) -> &MonoFrame {
        let index = self.cursor;
        self.cursor += 1;
        if self.cursor == self.frames.len() {
            self.cursor = 0;
        }
        &self.frames[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(frames: usize) -> Vec<i16> {
        (0..frames * FRAME_SAMPLES).map(|n| n as i16).collect()
    }

    #[test]
    fn rejects_partial_frame_lengths() {
        assert!(matches!(
            Calibration::new(&[0i16; 100]),
            Err(PipelineError::InvalidCalibrationLength(100))
        ));
        assert!(matches!(
            Calibration::new(&[]),
            Err(PipelineError::InvalidCalibrationLength(0))
        ));
    }

    #[test]
    fn cursor_wraps_with_no_gap_or_overlap() {
        let samples = tone(3);
        let mut calib = Calibration::new(&samples).unwrap();

        for pass in 0..2 {
            for frame_index in 0..3 {
                assert_eq!(calib.offset_samples(), frame_index * FRAME_SAMPLES);
                let frame = calib.next_frame();
                let expected_first = (frame_index * FRAME_SAMPLES) as i16;
                assert_eq!(frame[0], expected_first, "pass {pass}");
                assert_eq!(frame[FRAME_SAMPLES - 1], expected_first + 159);
            }
        }
        assert_eq!(calib.offset_samples(), 0);
    }
}
