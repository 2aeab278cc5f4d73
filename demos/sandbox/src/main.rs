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

//! Usage: `sandbox [--config mixer.json] [clip.wav|clip.ogg|...]`

use anyhow::{Context, Result};
use resona_core::audio::{LoopSpec, MixerConfig};
use resona_core::{Audio, Wave};
use resona_infra::SoftwareAudioBackend;
use std::f32::consts::TAU;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

struct Args {
    config: Option<PathBuf>,
    clip: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        clip: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path = iter.next().context("--config expects a path")?;
            args.config = Some(path.into());
        } else {
            args.clip = Some(arg.into());
        }
    }
    Ok(args)
}

/// One second of a 440 Hz sine at half amplitude.
fn sine(sample_rate: u32) -> Wave {
    let samples = (0..sample_rate)
        .map(|i| (TAU * 440.0 * i as f32 / sample_rate as f32).sin() * 0.5)
        .collect();
    Wave::from_mono(samples, sample_rate)
}

#[cfg(not(feature = "cpal"))]
fn peak(block: &[f32]) -> f32 {
    block.iter().fold(0.0, |peak, s| peak.max(s.abs()))
}

#[cfg(not(feature = "cpal"))]
/// Renders `seconds` of output in 100 ms blocks, logging the playback state.
fn run_offline(backend: &SoftwareAudioBackend, audio: &Audio, seconds: f64) {
    let block = (backend.config().output_sample_rate / 10) as usize;
    let blocks = (seconds * 10.0).round() as usize;
    for _ in 0..blocks {
        let out = backend.render(block);
        log::info!(
            "pos {:>6} ({:.2}s) played {:>6} playing={} paused={} peak {:.3}",
            audio.pos_sample(),
            audio.pos_sec(),
            audio.samples_played(),
            audio.is_playing(),
            audio.is_paused(),
            peak(&out)
        );
    }
}

#[cfg(feature = "cpal")]
fn run(backend: Arc<SoftwareAudioBackend>, audio: &Audio, seconds: f64) -> Result<()> {
    let device = resona_infra::CpalAudioDevice::from_config(backend.config());
    let mut output = resona_infra::AudioOutput::new(backend, Box::new(device));
    output.start()?;
    let steps = (seconds * 10.0).round() as u64;
    for _ in 0..steps {
        std::thread::sleep(Duration::from_millis(100));
        log::info!("pos {:.2}s playing={}", audio.pos_sec(), audio.is_playing());
    }
    Ok(())
}

#[cfg(not(feature = "cpal"))]
fn run(backend: Arc<SoftwareAudioBackend>, audio: &Audio, seconds: f64) -> Result<()> {
    run_offline(&backend, audio, seconds);
    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => MixerConfig::from_file(path)?,
        None => MixerConfig::default(),
    };
    let backend = SoftwareAudioBackend::shared(config);

    let audio = match &args.clip {
        Some(path) => {
            let loader = resona_io::AutoWaveLoader::new();
            Audio::from_file_with_loop(backend.clone(), &loader, path, LoopSpec::Whole)?
        }
        None => Audio::with_loop(
            backend.clone(),
            sine(backend.config().output_sample_rate),
            LoopSpec::BeginDuration(0.5),
        )?,
    };
    log::info!(
        "Loaded {} samples at {} Hz ({:.2}s)",
        audio.samples(),
        audio.sampling_rate(),
        audio.length_sec()
    );

    audio.play(Duration::from_millis(250));
    run(backend.clone(), &audio, 1.0)?;

    audio.set_speed_by_semitone(7);
    audio.play_one_shot(0.8, 0.5);
    log::info!("Speed {:.3} (range {}..={})", audio.speed(), audio.min_speed(), audio.max_speed());
    run(backend.clone(), &audio, 1.0)?;

    audio.pause(Duration::from_millis(200));
    run(backend.clone(), &audio, 0.5)?;
    audio.play(Duration::ZERO);
    audio.stop(Duration::from_millis(300));
    run(backend.clone(), &audio, 0.5)?;

    let mut audio = audio;
    audio.release();
    log::info!("Resources left after release: {}", backend.resource_count());
    Ok(())
}
