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
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crossbeam_channel::Receiver;

use crate::error::BridgeError;

pub mod mock;

// Named engine inputs and events. These are part of the engine script's
// contract and must match the names the script declares globally.
pub const LOAD_BUFFER: &str = "loadBuffer";
pub const LOAD_BUFFER_SIZE: &str = "loadBufferSize";
pub const LOAD_BUFFER_TRIGGER: &str = "loadBufferTrigger";
pub const WEB_KEY: &str = "webKey";
pub const WEB_KEY_EVENT: &str = "webKeyEvent";
pub const BPM: &str = "BPM";
pub const MIC_LEVEL: &str = "micLevel";

/// Callback used to surface the engine's diagnostic prints.
pub type PrintCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Future returned by asynchronous engine reads.
pub type FloatRead = Pin<Box<dyn Future<Output = Result<f32, BridgeError>> + Send>>;

/// The capability surface of the synthesis engine. The engine is an opaque
/// collaborator: it is given primitive values and named events and everything
/// else (scheduling, synthesis, DSP) happens on its side of this boundary.
///
/// The setters and `broadcast_event` are fire-and-forget: no acknowledgment is
/// awaited and no ordering is guaranteed beyond call order within one caller.
pub trait Engine: Send + Sync {
    /// Starts the engine. Must be called before anything else.
    fn start(&self) -> Result<(), BridgeError>;

    /// Compiles and runs engine source code.
    fn run_code(&self, source: &str) -> Result<(), BridgeError>;

    /// Sets a named float input.
    fn set_float(&self, name: &str, value: f64);

    /// Sets a named integer input.
    fn set_int(&self, name: &str, value: i64);

    /// Sets a named float array input.
    fn set_float_array(&self, name: &str, values: &[f32]);

    /// Broadcasts a named event to the engine script.
    fn broadcast_event(&self, name: &str);

    /// Asynchronously reads a named float output.
    fn get_float(&self, name: &str) -> FloatRead;

    /// Routes the engine's diagnostic prints to the given callback.
    fn set_print_callback(&self, callback: PrintCallback);

    /// Connects a microphone stream into the engine's audio graph.
    fn connect_mic(&self, stream: Receiver<Vec<f32>>);

    #[cfg(test)]
    fn to_mock(&self) -> Result<Arc<mock::Engine>, Box<dyn std::error::Error>>;
}

/// Gets an engine by name. Names beginning with "mock" resolve to the
/// built-in mock engine; a real engine binding would be registered here.
pub fn get_engine(name: &str) -> Result<Arc<dyn Engine>, BridgeError> {
    if name.starts_with("mock") {
        return Ok(Arc::new(mock::Engine::get(name)));
    }

    Err(BridgeError::EngineInit(format!(
        "unknown engine '{}'",
        name
    )))
}
