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

use anyhow::Result;
use resona_core::audio::WaveLoader;
use resona_io::{AutoWaveLoader, WavLoader};
use tempfile::tempdir;

fn write_ramp(path: &std::path::Path, frames: u32, rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for i in 0..frames {
        writer.write_sample((i % 1000) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

#[test]
fn test_auto_loader_reads_wav_file() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("ramp.wav");
    write_ramp(&path, 4410, 44100)?;

    let wave = AutoWaveLoader::new().load_file(&path)?;
    assert_eq!(wave.sample_rate, 44100);
    assert_eq!(wave.channels, 1);
    assert_eq!(wave.len_samples(), 4410);
    assert!((wave.length_sec() - 0.1).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_wav_and_auto_loaders_agree() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("ramp.wav");
    write_ramp(&path, 256, 8000)?;

    let direct = WavLoader::new().load_file(&path)?;
    let auto = AutoWaveLoader::new().load_file(&path)?;
    assert_eq!(direct, auto);
    Ok(())
}

#[test]
fn test_missing_file_reports_path() {
    let err = AutoWaveLoader::new()
        .load_file(std::path::Path::new("/no/such/clip.ogg"))
        .unwrap_err();
    assert!(format!("{err}").contains("clip.ogg"));
}
