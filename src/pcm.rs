//! Sample-layout conversions.
//!
//! All routines are pure, total functions over frames of the fixed build-time
//! length; none of them ever changes the frame count. Layouts:
//!
//! - interleaved stereo: `L0 R0 L1 R1 ...` (320 samples)
//! - planar stereo: `L0..L159 R0..R159` (320 samples)
//! - mono: `M0..M159` (160 samples)

use crate::{MonoFrame, StereoFrame, FRAME_SAMPLES};

/// De-interleave one stereo frame into planar layout.
pub fn interleaved_to_planar(input: &StereoFrame, out: &mut StereoFrame) {
    let (left, right) = out.split_at_mut(FRAME_SAMPLES);
    for (n, pair) in input.chunks_exact(2).enumerate() {
        left[n] = pair[0];
        right[n] = pair[1];
    }
}

/// Re-interleave one planar stereo frame.
pub fn planar_to_interleaved(input: &StereoFrame, out: &mut StereoFrame) {
    let (left, right) = input.split_at(FRAME_SAMPLES);
    for (n, pair) in out.chunks_exact_mut(2).enumerate() {
        pair[0] = left[n];
        pair[1] = right[n];
    }
}

/// Duplicate a mono frame into both channels of an interleaved stereo frame.
pub fn mono_to_interleaved(input: &MonoFrame, out: &mut StereoFrame) {
    for (pair, &sample) in out.chunks_exact_mut(2).zip(input.iter()) {
        pair[0] = sample;
        pair[1] = sample;
    }
}

/// Downmix an interleaved stereo frame to mono by averaging the channels.
pub fn interleaved_to_mono(input: &StereoFrame, out: &mut MonoFrame) {
    for (sample, pair) in out.iter_mut().zip(input.chunks_exact(2)) {
        *sample = ((pair[0] as i32 + pair[1] as i32) / 2) as i16;
    }
}
