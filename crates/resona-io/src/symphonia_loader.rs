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

//! Implements a universal wave loader using the `symphonia` library.

use crate::WaveLoadError;
use resona_core::audio::{Wave, WaveLoader};
use std::io::Cursor;
use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, errors::Error as SymphoniaError,
    formats::FormatOptions, io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};

/// A `WaveLoader` that uses `symphonia` to decode multiple audio formats
/// (Ogg Vorbis, MP3, FLAC, AAC, WAV, ...).
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaLoader;

impl SymphoniaLoader {
    /// Creates a new instance of `SymphoniaLoader`.
    pub fn new() -> Self {
        Self
    }

    /// Decodes every packet of the default track into an interleaved `Wave`.
    ///
    /// `extension` is an optional format hint such as `"ogg"`.
    pub fn decode(&self, bytes: &[u8], extension: Option<&str>) -> Result<Wave, WaveLoadError> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = extension {
            hint.with_extension(extension);
        }
        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();
        let probed = symphonia::default::get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;
        let mut format_reader = probed.format;

        let track = format_reader
            .default_track()
            .ok_or(WaveLoadError::NoDefaultTrack)?;

        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or(WaveLoadError::UnknownSampleRate)?;
        let channels = track
            .codec_params
            .channels
            .ok_or(WaveLoadError::UnknownChannels)?;

        let dec_opts: DecoderOptions = Default::default();
        let mut decoder = symphonia::default::get_codecs().make(&track.codec_params, &dec_opts)?;

        let mut all_samples = Vec::<f32>::new();

        loop {
            match format_reader.next_packet() {
                Ok(packet) => {
                    if packet.track_id() != track_id {
                        continue;
                    }

                    match decoder.decode(&packet) {
                        Ok(decoded) => {
                            // Planar buffers (LLL..., RRR...) are interleaved into LRLR...
                            let spec = *decoded.spec();
                            let capacity = decoded.capacity() as u64;
                            let mut sample_buf = SampleBuffer::<f32>::new(capacity, spec);
                            sample_buf.copy_interleaved_ref(decoded);
                            all_samples.extend_from_slice(sample_buf.samples());
                        }
                        // A corrupt packet is skipped, not fatal.
                        Err(SymphoniaError::DecodeError(err)) => {
                            log::warn!("Skipping undecodable packet: {err}");
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
                // End of stream
                Err(SymphoniaError::IoError(_)) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(Wave::new(all_samples, channels.count() as u16, sample_rate))
    }
}

impl WaveLoader for SymphoniaLoader {
    fn load(&self, bytes: &[u8]) -> anyhow::Result<Wave> {
        Ok(self.decode(bytes, None)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_wav(frames: usize, channels: u16, rate: u32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate: rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut bytes = Vec::new();
        {
            let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
            for i in 0..frames {
                let value = ((i as f32 * 0.05).sin() * 16000.0) as i16;
                for _ in 0..channels {
                    writer.write_sample(value).unwrap();
                }
            }
            writer.finalize().unwrap();
        }
        bytes
    }

    #[test]
    fn test_decodes_wav_through_format_detection() {
        let bytes = sine_wav(1000, 2, 32000);
        let wave = SymphoniaLoader::new().decode(&bytes, Some("wav")).unwrap();

        assert_eq!(wave.channels, 2);
        assert_eq!(wave.sample_rate, 32000);
        assert_eq!(wave.len_samples(), 1000);
        assert!(wave.samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn test_unknown_format_fails() {
        let result = SymphoniaLoader::new().decode(b"definitely not audio", None);
        assert!(result.is_err());
    }
}
