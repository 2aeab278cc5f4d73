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

//! Contains the `CpalAudioDevice` struct.

use crate::audio::format::{encode, negotiate_stream, OutputSample, SupportedLayout};
use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SizedSample, StreamConfig, SupportedStreamConfigRange};
use resona_core::audio::{AudioDevice, MixCallback, MixerConfig, StreamInfo};

/// Sample formats in the order they are tried for a negotiated layout.
const FORMAT_PREFERENCE: [SampleFormat; 4] = [
    SampleFormat::F32,
    SampleFormat::I16,
    SampleFormat::I32,
    SampleFormat::U16,
];

/// An [`AudioDevice`] that streams to the host's default output device via CPAL.
///
/// Without a preferred layout the device's default configuration is used.
/// With one, the closest supported layout is opened (see
/// [`negotiate_stream`]). Non-`f32` devices are fed through an `f32` scratch
/// buffer.
#[derive(Debug, Default)]
pub struct CpalAudioDevice {
    preferred: Option<StreamInfo>,
}

impl CpalAudioDevice {
    /// Creates a device that opens the host's default output configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a device that asks for `stream`, or the closest layout the host supports.
    pub fn with_preferred(stream: StreamInfo) -> Self {
        Self {
            preferred: Some(stream),
        }
    }

    /// Creates a device that asks for the layout described by `config`.
    pub fn from_config(config: &MixerConfig) -> Self {
        Self::with_preferred(config.stream_info())
    }

    fn select_config(&self, device: &cpal::Device) -> Result<(StreamConfig, SampleFormat)> {
        let default = device.default_output_config()?;
        let fallback = (default.config(), default.sample_format());
        let Some(preferred) = self.preferred else {
            return Ok(fallback);
        };

        let ranges: Vec<SupportedStreamConfigRange> = device.supported_output_configs()?.collect();
        let layouts: Vec<SupportedLayout> = ranges.iter().map(layout_of).collect();
        let Some(stream) = negotiate_stream(preferred, &layouts) else {
            log::warn!(
                "No output layout with {} channel(s); using the device default",
                preferred.channels
            );
            return Ok(fallback);
        };

        let range = FORMAT_PREFERENCE.iter().find_map(|format| {
            ranges.iter().find(|range| {
                range.sample_format() == *format && layout_of(range).contains(&stream)
            })
        });
        match range {
            Some(range) => {
                if stream != preferred {
                    log::info!(
                        "Requested {} Hz, opening the nearest supported rate {} Hz",
                        preferred.sample_rate,
                        stream.sample_rate
                    );
                }
                let config = range.clone().with_sample_rate(stream.sample_rate);
                Ok((config.config(), config.sample_format()))
            }
            None => Ok(fallback),
        }
    }
}

fn layout_of(range: &SupportedStreamConfigRange) -> SupportedLayout {
    SupportedLayout {
        channels: range.channels(),
        min_sample_rate: range.min_sample_rate(),
        max_sample_rate: range.max_sample_rate(),
    }
}

/// Opens an output stream of sample type `S`, mixing into an `f32` scratch buffer.
fn build_stream<S>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut on_mix_needed: MixCallback,
) -> Result<cpal::Stream>
where
    S: SizedSample + OutputSample + Send + 'static,
{
    let stream_info = StreamInfo {
        channels: config.channels,
        sample_rate: config.sample_rate,
    };
    let mut scratch: Vec<f32> = Vec::new();

    let audio_callback = move |output: &mut [S], _: &cpal::OutputCallbackInfo| {
        scratch.resize(output.len(), 0.0);
        on_mix_needed(&mut scratch, &stream_info);
        encode(&scratch, output);
    };

    let error_callback = |err| {
        log::error!("An error occurred on the audio stream: {err}");
    };

    Ok(device.build_output_stream(config, audio_callback, error_callback, None)?)
}

impl AudioDevice for CpalAudioDevice {
    fn start(self: Box<Self>, on_mix_needed: MixCallback) -> Result<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No default output device available"))?;
        let (config, format) = self.select_config(&device)?;

        log::info!(
            "Opening CPAL output stream ({} Hz, {} channel(s), {})",
            config.sample_rate,
            config.channels,
            format
        );

        let stream = match format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, on_mix_needed)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, on_mix_needed)?,
            SampleFormat::I32 => build_stream::<i32>(&device, &config, on_mix_needed)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, on_mix_needed)?,
            format => return Err(anyhow!("Unsupported sample format: {}", format)),
        };

        stream.play()?;

        // The stream stops when dropped; keep it alive for the rest of the process.
        std::mem::forget(stream);

        Ok(())
    }
}
