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

use approx::assert_relative_eq;
use resona_core::audio::{LoopSpec, MixerConfig};
use resona_core::{Audio, Wave};
use resona_infra::SoftwareAudioBackend;
use std::sync::Arc;
use std::time::Duration;

fn backend() -> Arc<SoftwareAudioBackend> {
    SoftwareAudioBackend::shared(MixerConfig {
        output_sample_rate: 100,
        channels: 2,
        ..MixerConfig::default()
    })
}

/// A mono ramp whose sample `i` has value `i / 1000`.
fn ramp(frames: usize) -> Wave {
    Wave::from_mono((0..frames).map(|i| i as f32 / 1000.0).collect(), 100)
}

#[test]
fn test_pause_and_resume_keeps_position() {
    let backend = backend();
    let audio = Audio::new(backend.clone(), ramp(100));

    assert!(!audio.play(Duration::ZERO));
    backend.render(10);
    assert_eq!(audio.pos_sample(), 10);

    audio.pause(Duration::ZERO);
    assert!(audio.is_paused());
    assert!(!audio.is_playing());
    backend.render(10);
    assert_eq!(audio.pos_sample(), 10);

    assert!(!audio.play(Duration::ZERO));
    assert!(audio.is_playing());
    assert!(audio.play(Duration::ZERO));
    backend.render(5);
    assert_eq!(audio.pos_sample(), 15);
    assert_relative_eq!(audio.pos_sec(), 0.15);
}

#[test]
fn test_stop_rewinds() {
    let backend = backend();
    let audio = Audio::new(backend.clone(), ramp(100));
    audio.play(Duration::ZERO);
    backend.render(30);

    audio.stop(Duration::ZERO);
    assert!(!audio.is_playing());
    assert!(!audio.is_paused());
    assert_eq!(audio.pos_sample(), 0);
    assert_eq!(audio.samples_played(), 0);
}

#[test]
fn test_non_looping_audio_stops_at_end() {
    let backend = backend();
    let audio = Audio::new(backend.clone(), ramp(20));
    audio.play(Duration::ZERO);
    backend.render(50);
    assert!(!audio.is_playing());
    assert_eq!(audio.pos_sample(), 0);
}

#[test]
fn test_loop_region_wraps_playback() {
    let backend = backend();
    let audio = Audio::with_loop(backend.clone(), ramp(20), LoopSpec::BeginEndSample(10, 14))
        .unwrap();
    assert_eq!(backend.loop_region(audio.id()).begin_sample, 10);
    assert_eq!(backend.loop_region(audio.id()).end_sample, 14);

    audio.play(Duration::ZERO);
    backend.render(15);
    assert!(audio.is_playing());
    assert_eq!(audio.pos_sample(), 10);

    backend.render(7);
    assert_eq!(audio.pos_sample(), 12);
    assert_eq!(audio.samples_played(), 22);
}

#[test]
fn test_loop_duration_form_clamps_to_last_sample() {
    let backend = backend();
    let audio = Audio::new(backend.clone(), ramp(100));
    let region = audio.set_loop(LoopSpec::BeginEndDuration(0.25, 5.0)).unwrap();
    assert!(region.enabled);
    assert_eq!(region.begin_sample, 25);
    assert_eq!(region.end_sample, 99);
    assert_eq!(backend.loop_region(audio.id()), region);
}

#[test]
fn test_invalid_loop_leaves_backend_untouched() {
    let backend = backend();
    let audio = Audio::new(backend.clone(), ramp(100));
    audio.set_loop(true).unwrap();

    assert!(audio.set_loop(LoopSpec::BeginSample(100)).is_err());
    assert!(audio.set_loop(LoopSpec::BeginEndSample(50, 50)).is_err());
    assert_eq!(backend.loop_region(audio.id()).begin_sample, 0);
    assert_eq!(backend.loop_region(audio.id()).end_sample, 99);
}

#[test]
fn test_fade_in_ramps_gain() {
    let backend = backend();
    let audio = Audio::new(backend.clone(), Wave::from_mono(vec![1.0; 100], 100));
    audio.play(Duration::from_millis(100));

    let out = backend.render(10);
    assert_relative_eq!(out[0], 0.0);
    assert_relative_eq!(out[10], 0.5, epsilon = 1e-6);
    let out = backend.render(1);
    assert_relative_eq!(out[0], 1.0, epsilon = 1e-6);
}

#[test]
fn test_fade_out_then_pause() {
    let backend = backend();
    let audio = Audio::new(backend.clone(), ramp(100));
    audio.play(Duration::ZERO);
    audio.pause(Duration::from_millis(50));
    assert!(audio.is_playing());

    backend.render(10);
    assert!(audio.is_paused());
    assert_eq!(audio.pos_sample(), 5);
}

#[test]
fn test_play_during_fade_out_is_not_already_playing() {
    let backend = backend();
    let audio = Audio::new(backend.clone(), ramp(100));
    audio.play(Duration::ZERO);
    audio.stop(Duration::from_millis(50));
    assert!(audio.is_playing());
    assert!(!audio.play(Duration::ZERO));

    backend.render(10);
    assert!(audio.is_playing());
    assert_eq!(audio.pos_sample(), 10);
}

#[test]
fn test_volume_is_clamped_and_applied() {
    let backend = backend();
    let audio = Audio::new(backend.clone(), Wave::from_mono(vec![0.5; 100], 100));
    audio.set_volume_lr(2.0, -1.0);
    assert_eq!(audio.volume_lr(), (1.0, 0.0));

    audio.set_volume_lr(0.5, 1.0);
    audio.play(Duration::ZERO);
    let out = backend.render(1);
    assert_relative_eq!(out[0], 0.25);
    assert_relative_eq!(out[1], 0.5);
}

#[test]
fn test_semitone_speed_changes_rate() {
    let backend = backend();
    let audio = Audio::new(backend.clone(), ramp(100));
    audio.set_speed_by_semitone(12);
    assert_relative_eq!(audio.speed(), 2.0);
    assert_relative_eq!(audio.max_speed(), 2.0);

    audio.play(Duration::ZERO);
    backend.render(10);
    assert_eq!(audio.pos_sample(), 20);

    audio.set_speed_by_semitone(24);
    assert_relative_eq!(audio.speed(), 2.0);
}

#[test]
fn test_one_shots_play_independently() {
    let backend = backend();
    let audio = Audio::new(backend.clone(), Wave::from_mono(vec![0.25; 10], 100));
    audio.play_one_shot(1.0, 1.0);
    audio.play_one_shot(0.5, 1.0);
    assert!(!audio.is_playing());

    let out = backend.render(2);
    assert_relative_eq!(out[0], 0.375);
    assert_eq!(backend.active_shots(audio.id()), 2);

    backend.render(20);
    assert_eq!(backend.active_shots(audio.id()), 0);

    audio.play_one_shot(1.0, 1.0);
    audio.stop_all_shots();
    assert_relative_eq!(backend.render(1)[0], 0.0);
}

#[test]
fn test_last_clone_releases_resource() {
    let backend = backend();
    let audio = Audio::new(backend.clone(), ramp(10));
    let copy = audio.clone();
    assert_eq!(audio, copy);
    assert_eq!(backend.resource_count(), 1);

    drop(audio);
    assert_eq!(backend.resource_count(), 1);
    assert_eq!(copy.samples(), 10);

    let mut copy = copy;
    copy.release();
    assert!(copy.is_empty());
    assert_eq!(backend.resource_count(), 0);
    assert_eq!(copy.samples(), 0);
    assert!(!copy.play(Duration::ZERO));
}

#[test]
fn test_empty_wave_gives_empty_handle() {
    let backend = backend();
    let audio = Audio::new(backend.clone(), Wave::default());
    assert!(audio.is_empty());
    assert_eq!(backend.resource_count(), 0);
    assert_eq!(audio, Audio::default());
}

#[test]
fn test_loads_wav_file_through_auto_loader() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tone.wav");
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 100,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&path, spec)?;
    for _ in 0..50 {
        writer.write_sample(0.5f32)?;
        writer.write_sample(-0.5f32)?;
    }
    writer.finalize()?;

    let backend = backend();
    let loader = resona_io::AutoWaveLoader::new();
    let audio = Audio::from_file_with_loop(backend.clone(), &loader, &path, true)?;
    assert_eq!(audio.samples(), 50);
    assert_eq!(audio.sampling_rate(), 100);
    assert_relative_eq!(audio.length_sec(), 0.5);

    audio.play(Duration::ZERO);
    let out = backend.render(60);
    assert_relative_eq!(out[0], 0.5);
    assert_relative_eq!(out[1], -0.5);
    assert!(audio.is_playing());
    assert_eq!(audio.pos_sample(), 10);
    Ok(())
}

#[test]
fn test_inverted_speed_range_never_panics() {
    assert!(MixerConfig::from_json(r#"{ "min_speed": 3.0, "max_speed": 2.0 }"#).is_err());

    let backend = SoftwareAudioBackend::shared(MixerConfig {
        min_speed: 3.0,
        max_speed: 2.0,
        ..MixerConfig::default()
    });
    let audio = Audio::new(backend.clone(), ramp(100));
    audio.set_speed(1.0);
    assert_relative_eq!(audio.speed(), 2.0);
    audio.set_speed_by_semitone(-12);
    assert_relative_eq!(audio.speed(), 2.0);
    audio.play_one_shot(1.0, 0.5);
    assert_eq!(backend.active_shots(audio.id()), 1);
    assert_eq!((audio.min_speed(), audio.max_speed()), (2.0, 3.0));
}
