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

//! Drives an [`AudioDevice`] from a [`SoftwareAudioBackend`].

use super::backends::software::SoftwareAudioBackend;
use anyhow::Result;
use resona_core::audio::{AudioDevice, StreamInfo};
use std::sync::Arc;

/// Connects an output device to the software mixer.
///
/// [`AudioOutput::start`] consumes the device whether or not the stream comes
/// up, so a failed start is terminal: build a new output with a fresh device
/// to try again.
pub struct AudioOutput {
    /// The device to stream to, until [`AudioOutput::start`] consumes it.
    device: Option<Box<dyn AudioDevice>>,
    /// The mixer rendering every block the device asks for.
    backend: Arc<SoftwareAudioBackend>,
    /// Whether the device stream came up.
    started: bool,
}

impl AudioOutput {
    /// Creates an output that will feed `device` from `backend`.
    pub fn new(backend: Arc<SoftwareAudioBackend>, device: Box<dyn AudioDevice>) -> Self {
        Self {
            device: Some(device),
            backend,
            started: false,
        }
    }

    /// Returns the mixer feeding this output.
    pub fn backend(&self) -> &Arc<SoftwareAudioBackend> {
        &self.backend
    }

    /// Returns `true` once the device stream has started successfully.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Starts the device stream.
    ///
    /// Calling it again after a successful start does nothing.
    ///
    /// # Errors
    ///
    /// Fails if the device cannot start, and on every later call once the
    /// device has been consumed by a failed start.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            log::debug!("Audio output already started");
            return Ok(());
        }
        let Some(device) = self.device.take() else {
            anyhow::bail!("Audio output device was consumed by a failed start");
        };

        let backend = self.backend.clone();
        let on_mix_needed = Box::new(move |output: &mut [f32], stream: &StreamInfo| {
            backend.mix(output, stream);
        });

        device.start(on_mix_needed)?;
        self.started = true;
        log::info!("Audio output started");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resona_core::audio::{AudioBackend, MixCallback, MixerConfig, Wave};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Pulls a fixed number of blocks synchronously and keeps what it rendered.
    struct BlockDevice {
        blocks: usize,
        rendered: Arc<Mutex<Vec<f32>>>,
    }

    impl AudioDevice for BlockDevice {
        fn start(self: Box<Self>, mut on_mix_needed: MixCallback) -> Result<()> {
            let stream = StreamInfo {
                channels: 2,
                sample_rate: 100,
            };
            let mut buffer = vec![0.0; 8];
            for _ in 0..self.blocks {
                on_mix_needed(&mut buffer, &stream);
                self.rendered.lock().unwrap().extend_from_slice(&buffer);
            }
            Ok(())
        }
    }

    struct FailingDevice;

    impl AudioDevice for FailingDevice {
        fn start(self: Box<Self>, _: MixCallback) -> Result<()> {
            anyhow::bail!("no device")
        }
    }

    #[test]
    fn test_start_feeds_device_from_mixer() {
        let backend = SoftwareAudioBackend::shared(MixerConfig::default());
        let id = backend.create(Wave::from_mono(vec![0.5; 100], 100));
        backend.play(id, Duration::ZERO);

        let rendered = Arc::new(Mutex::new(Vec::new()));
        let device = BlockDevice {
            blocks: 2,
            rendered: rendered.clone(),
        };
        let mut output = AudioOutput::new(backend.clone(), Box::new(device));
        assert!(!output.is_started());

        output.start().unwrap();
        assert!(output.is_started());
        assert_eq!(backend.pos_sample(id), 8);

        let rendered = rendered.lock().unwrap();
        assert_eq!(rendered.len(), 16);
        assert!(rendered.iter().all(|s| (s - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_second_start_is_noop() {
        let backend = SoftwareAudioBackend::shared(MixerConfig::default());
        let device = BlockDevice {
            blocks: 1,
            rendered: Arc::new(Mutex::new(Vec::new())),
        };
        let rendered = device.rendered.clone();
        let mut output = AudioOutput::new(backend, Box::new(device));
        output.start().unwrap();
        output.start().unwrap();
        assert!(output.is_started());
        assert_eq!(rendered.lock().unwrap().len(), 8);
    }

    #[test]
    fn test_failed_start_is_terminal() {
        let backend = SoftwareAudioBackend::shared(MixerConfig::default());
        let mut output = AudioOutput::new(backend, Box::new(FailingDevice));
        assert!(output.start().is_err());
        assert!(!output.is_started());

        let err = output.start().unwrap_err();
        assert!(err.to_string().contains("failed start"));
        assert!(!output.is_started());
    }
}
