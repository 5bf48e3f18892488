// Copyright (C) 2026 The livepad authors
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Microphone capture.
//!
//! The cpal stream is not `Send`, so it lives on a dedicated capture thread
//! that forwards sample chunks over a channel. The thread exits when the
//! `Microphone` handle is dropped.

use std::error::Error;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};
use tracing::{error, info, span, Level};

use crate::error::BridgeError;

const MOCK_SAMPLE_RATE: u32 = 44100;
const MOCK_CHUNK_INTERVAL: Duration = Duration::from_millis(10);

/// An open microphone. Holding this keeps the capture thread (and the
/// underlying stream) alive; dropping it shuts capture down.
pub struct Microphone {
    name: String,
    sample_rate: u32,
    stream: Option<Receiver<Vec<f32>>>,
    _shutdown: Sender<()>,
}

impl Microphone {
    /// Opens the named input device, or the host default if no name is given.
    /// Names beginning with "mock" yield a synthetic capture thread that emits
    /// a quiet sine tone, used by tests and the mock engine runtime.
    ///
    /// Any host, device, or stream failure is a permission error: the
    /// microphone could not be acquired.
    pub fn open(device_name: Option<&str>) -> Result<Microphone, BridgeError> {
        let (samples_tx, samples_rx) = crossbeam_channel::unbounded();
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);

        if device_name.is_some_and(|name| name.starts_with("mock")) {
            let name = device_name.unwrap_or_default().to_string();
            thread::spawn(move || Self::mock_capture(samples_tx, shutdown_rx));
            return Ok(Microphone {
                name,
                sample_rate: MOCK_SAMPLE_RATE,
                stream: Some(samples_rx),
                _shutdown: shutdown_tx,
            });
        }

        let (setup_tx, setup_rx) = crossbeam_channel::bounded(1);
        let requested = device_name.map(|name| name.to_string());
        thread::spawn(move || Self::capture(requested, setup_tx, samples_tx, shutdown_rx));

        let (name, sample_rate) = setup_rx
            .recv()
            .map_err(|e| BridgeError::Permission(e.to_string()))?
            .map_err(BridgeError::Permission)?;

        info!(device = name, sample_rate, "Microphone opened.");
        Ok(Microphone {
            name,
            sample_rate,
            stream: Some(samples_rx),
            _shutdown: shutdown_tx,
        })
    }

    /// The name of the underlying input device.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The capture sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Takes the capture stream so it can be connected into the engine's
    /// audio graph. Can only be taken once.
    pub fn take_stream(&mut self) -> Option<Receiver<Vec<f32>>> {
        self.stream.take()
    }

    /// Runs on the capture thread: opens the device, starts the input stream,
    /// reports the outcome through `setup_tx`, then parks until shutdown.
    fn capture(
        requested: Option<String>,
        setup_tx: Sender<Result<(String, u32), String>>,
        samples_tx: Sender<Vec<f32>>,
        shutdown_rx: Receiver<()>,
    ) {
        let span = span!(Level::INFO, "microphone capture");
        let _enter = span.enter();

        let setup = || -> Result<(cpal::Device, String, cpal::StreamConfig), String> {
            let host = cpal::default_host();
            let device = match &requested {
                Some(name) => host
                    .input_devices()
                    .map_err(|e| e.to_string())?
                    .find(|device| device.name().map(|n| &n == name).unwrap_or(false))
                    .ok_or_else(|| format!("no input device named '{}'", name))?,
                None => host
                    .default_input_device()
                    .ok_or_else(|| "no default input device".to_string())?,
            };
            let name = device.name().map_err(|e| e.to_string())?;
            let supported = device.default_input_config().map_err(|e| e.to_string())?;
            if supported.sample_format() != cpal::SampleFormat::F32 {
                return Err(format!(
                    "unsupported input sample format {:?}",
                    supported.sample_format()
                ));
            }
            Ok((device, name, supported.config()))
        };

        let (device, name, config) = match setup() {
            Ok(setup) => setup,
            Err(e) => {
                let _ = setup_tx.send(Err(e));
                return;
            }
        };

        let stream = device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // The consumer drains this continuously; if it has gone away
                // there is nothing useful left to do with the chunk.
                let _ = samples_tx.send(data.to_vec());
            },
            |e| error!(err = %e, "Microphone stream error."),
            None,
        );

        let stream = match stream {
            Ok(stream) => stream,
            Err(e) => {
                let _ = setup_tx.send(Err(e.to_string()));
                return;
            }
        };
        if let Err(e) = stream.play() {
            let _ = setup_tx.send(Err(e.to_string()));
            return;
        }

        let _ = setup_tx.send(Ok((name, config.sample_rate)));

        // Keep the stream alive until the Microphone handle is dropped.
        let _ = shutdown_rx.recv();
        info!("Microphone capture stopped.");
    }

    /// Synthetic capture: a 440Hz tone in 10ms chunks.
    fn mock_capture(samples_tx: Sender<Vec<f32>>, shutdown_rx: Receiver<()>) {
        let mut phase = 0.0f32;
        let step = 2.0 * std::f32::consts::PI * 440.0 / MOCK_SAMPLE_RATE as f32;
        let chunk_len = (MOCK_SAMPLE_RATE / 100) as usize;

        loop {
            match shutdown_rx.recv_timeout(MOCK_CHUNK_INTERVAL) {
                Ok(_) | Err(crossbeam_channel::RecvTimeoutError::Disconnected) => return,
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
            }

            let chunk: Vec<f32> = (0..chunk_len)
                .map(|_| {
                    phase = (phase + step) % (2.0 * std::f32::consts::PI);
                    phase.sin() * 0.1
                })
                .collect();
            if samples_tx.send(chunk).is_err() {
                return;
            }
        }
    }
}

/// Lists the input devices known to cpal.
pub fn list_devices() -> Result<Vec<String>, Box<dyn Error>> {
    let host = cpal::default_host();
    let mut names = Vec::new();
    for device in host.input_devices()? {
        names.push(device.name()?);
    }
    Ok(names)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_microphone_streams_chunks() {
        let mut mic = Microphone::open(Some("mock")).expect("failed to open mock mic");
        assert_eq!("mock", mic.name());
        assert_eq!(MOCK_SAMPLE_RATE, mic.sample_rate());

        let stream = mic.take_stream().expect("stream already taken");
        assert!(mic.take_stream().is_none());

        let chunk = stream
            .recv_timeout(Duration::from_secs(1))
            .expect("no chunk received");
        assert!(!chunk.is_empty());
        assert!(chunk.iter().all(|s| s.abs() <= 0.1));
    }

    #[test]
    fn test_dropping_microphone_stops_capture() {
        let mut mic = Microphone::open(Some("mock")).expect("failed to open mock mic");
        let stream = mic.take_stream().expect("stream already taken");
        drop(mic);

        // Drain whatever was in flight; the channel must then disconnect.
        loop {
            match stream.recv_timeout(Duration::from_secs(1)) {
                Ok(_) => continue,
                Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                Err(e) => panic!("capture thread did not stop: {}", e),
            }
        }
    }
}
