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

//! The live session: the engine handle, the sample store, and the one-shot
//! bootstrap sequence that wires them together.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::engine::{
    self, Engine, BPM, LOAD_BUFFER, LOAD_BUFFER_SIZE, LOAD_BUFFER_TRIGGER, WEB_KEY, WEB_KEY_EVENT,
};
use crate::error::BridgeError;
use crate::keys;
use crate::mic::Microphone;
use crate::samples::{decoder, SampleStore};
use crate::status::{Status, StatusBoard};
use crate::util;

/// A live session. Owns the engine, the sample store, and the microphone;
/// exists only after a fully successful bootstrap and lives until the process
/// ends.
pub struct Session {
    engine: Arc<dyn Engine>,
    store: SampleStore,
    status: Arc<StatusBoard>,
    // Held to keep the capture thread alive for the session's lifetime.
    _mic: Microphone,
}

impl Session {
    /// Runs the one-shot bootstrap sequence. Each step is a precondition for
    /// the next; the first failure is reported on the status board verbatim
    /// and aborts the sequence. Nothing persistent is allocated before the
    /// engine starts, so there is no rollback: a failed bootstrap leaves the
    /// system in a clean not-started state and retry means calling this again.
    pub fn bootstrap(config: &Config) -> Result<Session, BridgeError> {
        Session::bootstrap_with_status(config, Arc::new(StatusBoard::new()))
    }

    /// Bootstrap against a caller-provided status board.
    pub fn bootstrap_with_status(
        config: &Config,
        status: Arc<StatusBoard>,
    ) -> Result<Session, BridgeError> {
        match Session::init(config, Arc::clone(&status)) {
            Ok(session) => Ok(session),
            Err(e) => {
                status.set_status(Status::Error(e.to_string()));
                Err(e)
            }
        }
    }

    fn init(config: &Config, status: Arc<StatusBoard>) -> Result<Session, BridgeError> {
        status.set_status(Status::InitializingAudio);
        let mut mic = Microphone::open(config.mic_device.as_deref())?;

        status.set_status(Status::StartingEngine);
        let engine = engine::get_engine(&config.engine)?;
        engine.start()?;

        // Connect the microphone into the engine's audio graph.
        let stream = mic.take_stream().ok_or_else(|| {
            BridgeError::EngineInit("microphone stream already connected".to_string())
        })?;
        engine.connect_mic(stream);

        // Route the engine's diagnostic prints to the console.
        {
            let status = Arc::clone(&status);
            engine.set_print_callback(Box::new(move |line| status.log(line)));
        }

        let script_name = util::filename_display(&config.script).to_string();
        status.set_status(Status::LoadingScript(script_name));
        let source =
            fs::read_to_string(&config.script).map_err(|e| BridgeError::ResourceLoad {
                path: config.script.display().to_string(),
                message: e.to_string(),
            })?;

        engine.run_code(&source)?;

        // A configured starting tempo reaches the script before any keypress.
        if let Some(bpm) = config.bpm {
            engine.set_float(BPM, bpm);
        }

        status.set_status(Status::Running);
        info!(
            engine = config.engine,
            mic = mic.name(),
            mic_rate = mic.sample_rate(),
            script = %config.script.display(),
            "Session started."
        );

        Ok(Session {
            engine,
            store: SampleStore::new(),
            status,
            _mic: mic,
        })
    }

    /// Decodes an upload batch into key bindings. At most six files are
    /// processed, strictly one at a time in selection order; a file that fails
    /// to decode is logged and skipped without disturbing the rest of the
    /// batch or existing bindings.
    pub fn load_batch(&mut self, paths: &[PathBuf]) {
        for (position, path) in paths.iter().enumerate() {
            let key = match keys::by_position(position) {
                Some(key) => key,
                None => {
                    warn!(
                        ignored = paths.len() - position,
                        "More files than trigger keys; ignoring the rest of the batch."
                    );
                    break;
                }
            };

            let name = util::filename_display(path).to_string();
            self.status.log(&format!("Processing {}...", name));

            match decoder::decode_file(path) {
                Ok(decoded) => {
                    let mono = decoder::mix_to_mono(&decoded.samples, decoded.channels);
                    self.store.bind(key.code, mono, &name);
                    self.status.log(&format!("Mapped {} -> [{}]", name, key.label));
                }
                Err(e) => {
                    self.status.log(&format!("Error: {}", e));
                }
            }
        }

        self.status.set_mapping(self.store.mapping_display());
    }

    /// Dispatches a key-down. Auto-repeat key-downs are dropped: a held key
    /// must not retrigger. A bound key stages its sample in the engine and
    /// fires the load trigger; any other key is forwarded as a generic key
    /// event for the engine script to interpret. The three calls for one
    /// keypress happen in order before the next keypress is dispatched.
    pub fn handle_key(&self, code: u32, repeat: bool) {
        if repeat {
            return;
        }

        if let Some(binding) = self.store.get(code) {
            self.status
                .log(&format!("Uploading {} to active slot...", binding.file_name));
            self.engine.set_float_array(LOAD_BUFFER, &binding.sample);
            self.engine
                .set_int(LOAD_BUFFER_SIZE, binding.sample.len() as i64);
            self.engine.broadcast_event(LOAD_BUFFER_TRIGGER);
        } else {
            self.engine.set_int(WEB_KEY, code as i64);
            self.engine.broadcast_event(WEB_KEY_EVENT);
        }
    }

    /// Forwards a tempo change to the engine. Values that don't parse as a
    /// positive finite number are silently ignored.
    pub fn set_tempo(&self, text: &str) {
        match text.trim().parse::<f64>() {
            Ok(bpm) if bpm.is_finite() && bpm > 0.0 => self.engine.set_float(BPM, bpm),
            _ => {}
        }
    }

    pub fn engine(&self) -> Arc<dyn Engine> {
        Arc::clone(&self.engine)
    }

    pub fn status(&self) -> Arc<StatusBoard> {
        Arc::clone(&self.status)
    }
}
