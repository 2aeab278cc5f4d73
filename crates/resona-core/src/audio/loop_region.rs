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

//! Loop requests and their normalization into sample-accurate loop regions.
//!
//! Callers describe a loop in whichever unit is convenient (the whole track, a
//! begin sample, a begin/end pair in samples or seconds). [`LoopSpec::resolve`]
//! turns every form into one canonical [`LoopRegion`], which is the only shape
//! an [`AudioBackend`](super::AudioBackend) ever receives.
//!
//! Normalization rules, for a wave of `N` samples:
//! - The loop end is always clamped to `N - 1`.
//! - A begin position must address an existing sample (`begin < N`).
//! - When an end is given explicitly, it must lie strictly after the begin.
//! - Second-based positions are converted with `floor(rate * max(t, 0))` and
//!   then validated exactly like sample positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized loop configuration, as forwarded to the backend.
///
/// When `enabled`, `begin_sample <= end_sample <= total_samples - 1` holds.
/// A disabled region is always `(false, 0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LoopRegion {
    /// Whether playback wraps from `end_sample` back to `begin_sample`.
    pub enabled: bool,
    /// The first sample of the loop body.
    pub begin_sample: u64,
    /// The last sample of the loop body, inclusive.
    pub end_sample: u64,
}

impl LoopRegion {
    /// The region that turns looping off.
    pub const DISABLED: LoopRegion = LoopRegion {
        enabled: false,
        begin_sample: 0,
        end_sample: 0,
    };

    /// Creates an enabled region covering `begin..=end`.
    pub const fn new(begin_sample: u64, end_sample: u64) -> Self {
        Self {
            enabled: true,
            begin_sample,
            end_sample,
        }
    }

    /// Returns the number of samples in the loop body, or `0` when disabled.
    pub fn len_samples(&self) -> u64 {
        if !self.enabled || self.end_sample < self.begin_sample {
            return 0;
        }
        self.end_sample - self.begin_sample + 1
    }
}

/// The loop positions accepted by the engine's asset loaders and scene files.
///
/// Positions are in samples. A missing `end` loops to the last sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioLoopTiming {
    /// The first sample of the loop body.
    pub begin: u64,
    /// The last sample of the loop body, if it is not the end of the track.
    #[serde(default)]
    pub end: Option<u64>,
}

impl AudioLoopTiming {
    /// Loops from `begin` to the end of the track.
    pub const fn from_begin(begin: u64) -> Self {
        Self { begin, end: None }
    }

    /// Loops from `begin` to `end`.
    pub const fn new(begin: u64, end: u64) -> Self {
        Self {
            begin,
            end: Some(end),
        }
    }
}

/// A loop request in any of the supported forms.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LoopSpec {
    /// Looping disabled.
    #[default]
    None,
    /// Loop the whole track.
    Whole,
    /// Loop from a sample index to the end of the track.
    BeginSample(u64),
    /// Loop between two sample indices. The end is clamped to the last sample.
    BeginEndSample(u64, u64),
    /// Loop from a time offset, in seconds, to the end of the track.
    BeginDuration(f64),
    /// Loop between two time offsets, in seconds. The end is clamped to the last sample.
    BeginEndDuration(f64, f64),
}

impl LoopSpec {
    /// Returns `true` unless this is [`LoopSpec::None`].
    pub fn is_enabled(&self) -> bool {
        !matches!(self, LoopSpec::None)
    }

    /// Normalizes the request against a wave of `total_samples` samples played
    /// at `sampling_rate` Hz.
    ///
    /// # Errors
    ///
    /// Returns a [`LoopError`] when the request cannot describe a loop inside
    /// the wave. Nothing is clamped into validity except the loop end.
    pub fn resolve(self, total_samples: u64, sampling_rate: u32) -> Result<LoopRegion, LoopError> {
        if !self.is_enabled() {
            return Ok(LoopRegion::DISABLED);
        }

        if total_samples == 0 {
            return Err(LoopError::EmptyWave);
        }

        let last_sample = total_samples - 1;

        match self {
            LoopSpec::None => Ok(LoopRegion::DISABLED),
            LoopSpec::Whole => Ok(LoopRegion::new(0, last_sample)),
            LoopSpec::BeginSample(begin) => {
                check_begin(begin, total_samples)?;
                Ok(LoopRegion::new(begin, last_sample))
            }
            LoopSpec::BeginEndSample(begin, end) => {
                check_begin(begin, total_samples)?;
                if begin >= end {
                    return Err(LoopError::EmptyRegion { begin, end });
                }
                Ok(LoopRegion::new(begin, end.min(last_sample)))
            }
            LoopSpec::BeginDuration(begin) => {
                let begin = seconds_to_sample(begin, sampling_rate);
                LoopSpec::BeginSample(begin).resolve(total_samples, sampling_rate)
            }
            LoopSpec::BeginEndDuration(begin, end) => {
                let begin = seconds_to_sample(begin, sampling_rate);
                let end = seconds_to_sample(end, sampling_rate);
                LoopSpec::BeginEndSample(begin, end).resolve(total_samples, sampling_rate)
            }
        }
    }
}

impl From<bool> for LoopSpec {
    fn from(enabled: bool) -> Self {
        if enabled {
            LoopSpec::Whole
        } else {
            LoopSpec::None
        }
    }
}

impl From<AudioLoopTiming> for LoopSpec {
    fn from(timing: AudioLoopTiming) -> Self {
        match timing.end {
            Some(end) => LoopSpec::BeginEndSample(timing.begin, end),
            None => LoopSpec::BeginSample(timing.begin),
        }
    }
}

impl From<Option<AudioLoopTiming>> for LoopSpec {
    fn from(timing: Option<AudioLoopTiming>) -> Self {
        timing.map_or(LoopSpec::None, LoopSpec::from)
    }
}

/// Converts a time offset to a sample index: `floor(rate * max(seconds, 0))`.
///
/// NaN is treated as zero and values past `u64::MAX` saturate.
pub fn seconds_to_sample(seconds: f64, sampling_rate: u32) -> u64 {
    (sampling_rate as f64 * seconds.max(0.0)) as u64
}

fn check_begin(begin: u64, total_samples: u64) -> Result<(), LoopError> {
    if begin >= total_samples {
        return Err(LoopError::BeginOutOfRange {
            begin,
            total_samples,
        });
    }
    Ok(())
}

/// A loop request that violates the loop-region preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopError {
    /// A loop was requested on a wave without samples.
    EmptyWave,
    /// The loop begin does not address a sample of the wave.
    BeginOutOfRange {
        /// The requested begin sample.
        begin: u64,
        /// The number of samples in the wave.
        total_samples: u64,
    },
    /// The requested end does not lie after the begin.
    EmptyRegion {
        /// The requested begin sample.
        begin: u64,
        /// The requested end sample.
        end: u64,
    },
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopError::EmptyWave => write!(f, "Cannot loop a wave without samples"),
            LoopError::BeginOutOfRange {
                begin,
                total_samples,
            } => write!(
                f,
                "Loop begin {begin} is out of range for a wave of {total_samples} samples"
            ),
            LoopError::EmptyRegion { begin, end } => {
                write!(f, "Loop end {end} must be greater than loop begin {begin}")
            }
        }
    }
}

impl std::error::Error for LoopError {}
