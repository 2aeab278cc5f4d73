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

//! Per-resource playback state of the software mixer.

use resona_core::audio::{LoopRegion, StreamInfo, Wave};
use std::collections::VecDeque;
use std::sync::Arc;

/// Where the main voice of a resource is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// What happens once a fade reaches its target gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FadeEnd {
    Continue,
    Pause,
    Stop,
}

/// A linear gain ramp. The length is kept in seconds and converted to output
/// frames when rendering, so the ramp follows whatever rate the device runs at.
#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f64,
    to: f64,
    duration: f64,
    elapsed_frames: u64,
    end: FadeEnd,
}

impl Fade {
    fn new(from: f64, to: f64, duration: f64, end: FadeEnd) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed_frames: 0,
            end,
        }
    }

    fn total_frames(&self, sample_rate: u32) -> u64 {
        ((self.duration * sample_rate as f64).round() as u64).max(1)
    }

    /// Advances by one output frame and returns the new gain.
    fn step(&mut self, sample_rate: u32) -> f64 {
        self.elapsed_frames += 1;
        let t = (self.elapsed_frames as f64 / self.total_frames(sample_rate) as f64).min(1.0);
        self.from + (self.to - self.from) * t
    }

    fn is_finished(&self, sample_rate: u32) -> bool {
        self.elapsed_frames >= self.total_frames(sample_rate)
    }
}

#[derive(Debug, Clone, Copy)]
struct OneShot {
    cursor: f64,
    volume: f64,
    pitch: f64,
}

/// One resource: its wave, the main playback cursor and its one-shot voices.
pub(super) struct Voice {
    wave: Arc<Wave>,
    loop_region: LoopRegion,
    state: PlaybackState,
    cursor: f64,
    played: f64,
    gain: f64,
    fade: Option<Fade>,
    volume: (f64, f64),
    speed: f64,
    shots: VecDeque<OneShot>,
}

impl Voice {
    pub(super) fn new(wave: Arc<Wave>) -> Self {
        Self {
            wave,
            loop_region: LoopRegion::DISABLED,
            state: PlaybackState::Stopped,
            cursor: 0.0,
            played: 0.0,
            gain: 0.0,
            fade: None,
            volume: (1.0, 1.0),
            speed: 1.0,
            shots: VecDeque::new(),
        }
    }

    pub(super) fn wave(&self) -> &Arc<Wave> {
        &self.wave
    }

    pub(super) fn state(&self) -> PlaybackState {
        self.state
    }

    pub(super) fn loop_region(&self) -> LoopRegion {
        self.loop_region
    }

    pub(super) fn set_loop(&mut self, region: LoopRegion) {
        self.loop_region = region;
    }

    pub(super) fn volume(&self) -> (f64, f64) {
        self.volume
    }

    pub(super) fn set_volume(&mut self, volume: (f64, f64)) {
        self.volume = volume;
    }

    pub(super) fn speed(&self) -> f64 {
        self.speed
    }

    pub(super) fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub(super) fn pos_sample(&self) -> i64 {
        self.cursor.floor() as i64
    }

    /// The furthest frame the interpolator has fetched.
    pub(super) fn stream_pos_sample(&self) -> i64 {
        (self.cursor.ceil() as i64).min(self.wave.len_samples() as i64)
    }

    pub(super) fn samples_played(&self) -> i64 {
        self.played.floor() as i64
    }

    pub(super) fn shot_count(&self) -> usize {
        self.shots.len()
    }

    fn is_fading_out(&self) -> bool {
        self.fade.is_some_and(|fade| fade.end != FadeEnd::Continue)
    }

    /// Starts or resumes. Returns `true` if the voice was already playing.
    pub(super) fn play(&mut self, fade_in: f64) -> bool {
        let was_playing = self.state == PlaybackState::Playing && !self.is_fading_out();

        match self.state {
            PlaybackState::Stopped => {
                self.cursor = 0.0;
                self.played = 0.0;
                self.gain = 0.0;
            }
            PlaybackState::Paused => self.gain = 0.0,
            PlaybackState::Playing => {}
        }
        self.state = PlaybackState::Playing;

        if fade_in > 0.0 {
            self.fade = Some(Fade::new(self.gain, 1.0, fade_in, FadeEnd::Continue));
        } else {
            self.fade = None;
            self.gain = 1.0;
        }
        was_playing
    }

    pub(super) fn pause(&mut self, fade_out: f64) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.fade_out(fade_out, FadeEnd::Pause);
    }

    pub(super) fn stop(&mut self, fade_out: f64) {
        if self.state == PlaybackState::Playing {
            self.fade_out(fade_out, FadeEnd::Stop);
        } else {
            self.finish(FadeEnd::Stop);
        }
    }

    fn fade_out(&mut self, duration: f64, end: FadeEnd) {
        if duration > 0.0 {
            self.fade = Some(Fade::new(self.gain, 0.0, duration, end));
        } else {
            self.finish(end);
        }
    }

    fn finish(&mut self, end: FadeEnd) {
        self.fade = None;
        match end {
            FadeEnd::Continue => {}
            FadeEnd::Pause => {
                self.state = PlaybackState::Paused;
                self.gain = 0.0;
            }
            FadeEnd::Stop => {
                self.state = PlaybackState::Stopped;
                self.cursor = 0.0;
                self.played = 0.0;
                self.gain = 0.0;
            }
        }
    }

    pub(super) fn push_shot(&mut self, volume: f64, pitch: f64, max_shots: usize) {
        if max_shots == 0 {
            return;
        }
        while self.shots.len() >= max_shots {
            self.shots.pop_front();
        }
        self.shots.push_back(OneShot {
            cursor: 0.0,
            volume,
            pitch,
        });
    }

    pub(super) fn stop_all_shots(&mut self) {
        self.shots.clear();
    }

    /// Reads the interpolated frame at `position`, following the loop when
    /// `looping` is set.
    fn sample_at(&self, position: f64, looping: bool) -> (f32, f32) {
        let index = position.floor() as u64;
        let fract = (position - position.floor()) as f32;

        let next = if looping && self.loop_region.enabled && index >= self.loop_region.end_sample {
            self.loop_region.begin_sample
        } else {
            index + 1
        };

        let (l1, r1) = self.wave.frame(index);
        let (l2, r2) = self.wave.frame(next);
        (l1 + (l2 - l1) * fract, r1 + (r2 - r1) * fract)
    }

    /// Mixes the main voice into `output`, advancing cursor, loop and fade.
    pub(super) fn render(&mut self, output: &mut [f32], stream: &StreamInfo) {
        if self.state != PlaybackState::Playing {
            return;
        }

        let total = self.wave.len_samples();
        if total == 0 {
            self.finish(FadeEnd::Stop);
            return;
        }

        let step = self.speed * self.wave.sample_rate as f64 / stream.sample_rate as f64;

        for frame in output.chunks_exact_mut(stream.channels as usize) {
            let (left, right) = self.sample_at(self.cursor, true);
            write_frame(
                frame,
                left * (self.gain * self.volume.0) as f32,
                right * (self.gain * self.volume.1) as f32,
            );

            self.cursor += step;
            self.played += step;

            if self.loop_region.enabled {
                let loop_end = self.loop_region.end_sample as f64 + 1.0;
                if self.cursor >= loop_end {
                    let len = self.loop_region.len_samples().max(1) as f64;
                    self.cursor =
                        self.loop_region.begin_sample as f64 + (self.cursor - loop_end) % len;
                }
            } else if self.cursor >= total as f64 {
                self.finish(FadeEnd::Stop);
                return;
            }

            if let Some(fade) = self.fade.as_mut() {
                self.gain = fade.step(stream.sample_rate);
                if fade.is_finished(stream.sample_rate) {
                    let end = fade.end;
                    self.finish(end);
                    if self.state != PlaybackState::Playing {
                        return;
                    }
                }
            }
        }
    }

    /// Mixes every one-shot voice into `output` and drops the finished ones.
    pub(super) fn render_shots(&mut self, output: &mut [f32], stream: &StreamInfo) {
        if self.shots.is_empty() {
            return;
        }

        let total = self.wave.len_samples() as f64;
        let rate_ratio = self.wave.sample_rate as f64 / stream.sample_rate as f64;
        let mut shots = std::mem::take(&mut self.shots);

        shots.retain_mut(|shot| {
            let step = rate_ratio * shot.pitch;
            for frame in output.chunks_exact_mut(stream.channels as usize) {
                if shot.cursor >= total {
                    return false;
                }
                let (left, right) = self.sample_at(shot.cursor, false);
                let gain = shot.volume as f32;
                write_frame(frame, left * gain, right * gain);
                shot.cursor += step;
            }
            shot.cursor < total
        });

        self.shots = shots;
    }
}

fn write_frame(frame: &mut [f32], left: f32, right: f32) {
    match frame {
        [] => {}
        [mono] => *mono += (left + right) * 0.5,
        [l, r, ..] => {
            *l += left;
            *r += right;
        }
    }
}
