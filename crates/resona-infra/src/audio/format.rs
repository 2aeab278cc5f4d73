// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Stream negotiation and sample encoding for output devices.
//!
//! The mixer always renders `f32`. Devices that want another sample type mix
//! into an `f32` scratch buffer and [`encode`] it into the device buffer.

use resona_core::audio::StreamInfo;

/// A range of stream layouts reported as supported by an output device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedLayout {
    /// Channel count of the range.
    pub channels: u16,
    /// Lowest supported sampling rate, in Hz.
    pub min_sample_rate: u32,
    /// Highest supported sampling rate, in Hz.
    pub max_sample_rate: u32,
}

impl SupportedLayout {
    /// Returns `true` if `stream` falls inside this range.
    pub fn contains(&self, stream: &StreamInfo) -> bool {
        self.channels == stream.channels
            && (self.min_sample_rate..=self.max_sample_rate).contains(&stream.sample_rate)
    }
}

/// Chooses the layout to open for a `preferred` one.
///
/// The preferred layout wins when a range contains it. Otherwise the first
/// range with the preferred channel count is used at its rate nearest to the
/// preferred rate. Returns `None` when no range has that channel count.
pub fn negotiate_stream(
    preferred: StreamInfo,
    supported: &[SupportedLayout],
) -> Option<StreamInfo> {
    if supported.iter().any(|layout| layout.contains(&preferred)) {
        return Some(preferred);
    }

    supported
        .iter()
        .filter(|layout| layout.channels == preferred.channels)
        .map(|layout| StreamInfo {
            channels: layout.channels,
            sample_rate: preferred
                .sample_rate
                .clamp(layout.min_sample_rate, layout.max_sample_rate),
        })
        .min_by_key(|stream| stream.sample_rate.abs_diff(preferred.sample_rate))
}

/// A device sample type the mixer output can be converted to.
pub trait OutputSample: Copy {
    /// Converts one mixed sample, clipping it to `[-1, 1]` first.
    fn from_mix(sample: f32) -> Self;
}

impl OutputSample for f32 {
    fn from_mix(sample: f32) -> Self {
        sample.clamp(-1.0, 1.0)
    }
}

impl OutputSample for i16 {
    fn from_mix(sample: f32) -> Self {
        (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
    }
}

impl OutputSample for i32 {
    fn from_mix(sample: f32) -> Self {
        (sample.clamp(-1.0, 1.0) as f64 * i32::MAX as f64) as i32
    }
}

impl OutputSample for u16 {
    fn from_mix(sample: f32) -> Self {
        ((sample.clamp(-1.0, 1.0) + 1.0) * 0.5 * u16::MAX as f32).round() as u16
    }
}

/// Converts `mixed` into `output`, sample by sample.
pub fn encode<S: OutputSample>(mixed: &[f32], output: &mut [S]) {
    for (dst, src) in output.iter_mut().zip(mixed) {
        *dst = S::from_mix(*src);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEREO_48K: StreamInfo = StreamInfo {
        channels: 2,
        sample_rate: 48000,
    };

    #[test]
    fn test_preferred_layout_is_kept_when_supported() {
        let supported = [
            SupportedLayout {
                channels: 1,
                min_sample_rate: 8000,
                max_sample_rate: 48000,
            },
            SupportedLayout {
                channels: 2,
                min_sample_rate: 44100,
                max_sample_rate: 96000,
            },
        ];
        assert_eq!(negotiate_stream(STEREO_48K, &supported), Some(STEREO_48K));
    }

    #[test]
    fn test_nearest_rate_is_chosen() {
        let supported = [
            SupportedLayout {
                channels: 2,
                min_sample_rate: 8000,
                max_sample_rate: 22050,
            },
            SupportedLayout {
                channels: 2,
                min_sample_rate: 44100,
                max_sample_rate: 44100,
            },
        ];
        let stream = negotiate_stream(STEREO_48K, &supported).unwrap();
        assert_eq!(stream.channels, 2);
        assert_eq!(stream.sample_rate, 44100);
    }

    #[test]
    fn test_channel_mismatch_fails() {
        let supported = [SupportedLayout {
            channels: 6,
            min_sample_rate: 48000,
            max_sample_rate: 48000,
        }];
        assert_eq!(negotiate_stream(STEREO_48K, &supported), None);
        assert_eq!(negotiate_stream(STEREO_48K, &[]), None);
    }

    #[test]
    fn test_encode_integer_formats() {
        let mixed = [-1.0, 0.0, 0.5, 2.0];

        let mut i16_out = [0i16; 4];
        encode(&mixed, &mut i16_out);
        assert_eq!(i16_out, [-i16::MAX, 0, i16::MAX / 2, i16::MAX]);

        let mut u16_out = [0u16; 4];
        encode(&mixed, &mut u16_out);
        assert_eq!(u16_out[0], 0);
        assert_eq!(u16_out[1], 32768);
        assert_eq!(u16_out[3], u16::MAX);

        let mut i32_out = [0i32; 4];
        encode(&mixed, &mut i32_out);
        assert_eq!(i32_out[0], -i32::MAX);
        assert_eq!(i32_out[3], i32::MAX);
    }

    #[test]
    fn test_encode_f32_clips() {
        let mut out = [0.0f32; 3];
        encode(&[1.5, -0.25, -3.0], &mut out);
        assert_eq!(out, [1.0, -0.25, -1.0]);
    }
}
