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
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use tracing::warn;

use crate::error::BridgeError;

use super::{FloatRead, PrintCallback, MIC_LEVEL};

/// Source containing this marker makes `run_code` fail, for fault-injection
/// in tests.
pub const RUN_FAIL_MARKER: &str = "mock:fail";

/// A single recorded engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    RunCode(String),
    SetFloat(String, f64),
    SetInt(String, i64),
    SetFloatArray(String, Vec<f32>),
    BroadcastEvent(String),
}

struct Inner {
    name: String,
    started: AtomicBool,
    calls: Mutex<Vec<Call>>,
    print: Mutex<Option<PrintCallback>>,
    mic: Mutex<Option<Receiver<Vec<f32>>>>,
    last_level: Mutex<f32>,
}

/// A mock engine. Doesn't synthesize anything: it records every call so the
/// glue around it can be exercised without a real engine, and derives
/// `micLevel` from the most recent connected microphone chunk.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<Inner>,
}

impl Engine {
    /// Gets the given mock engine.
    pub fn get(name: &str) -> Engine {
        Engine {
            inner: Arc::new(Inner {
                name: name.to_string(),
                started: AtomicBool::new(false),
                calls: Mutex::new(Vec::new()),
                print: Mutex::new(None),
                mic: Mutex::new(None),
                last_level: Mutex::new(0.0),
            }),
        }
    }

    /// Returns all calls recorded so far, in order.
    #[cfg(test)]
    pub fn calls(&self) -> Vec<Call> {
        self.inner.calls.lock().clone()
    }

    /// Clears the recorded calls.
    #[cfg(test)]
    pub fn clear_calls(&self) {
        self.inner.calls.lock().clear();
    }

    fn record(&self, call: Call) {
        if !self.inner.started.load(Ordering::Relaxed) {
            warn!(engine = self.inner.name, "Engine call before start.");
        }
        self.inner.calls.lock().push(call);
    }

    fn print(&self, line: &str) {
        if let Some(callback) = self.inner.print.lock().as_ref() {
            callback(line);
        }
    }

    /// Drains the mic stream and returns the peak absolute sample of the most
    /// recently received chunk, or the previous reading if nothing arrived.
    fn mic_level(&self) -> f32 {
        let mic = self.inner.mic.lock();
        let mut last_level = self.inner.last_level.lock();

        if let Some(stream) = mic.as_ref() {
            if let Some(chunk) = stream.try_iter().last() {
                *last_level = chunk.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
            }
        }

        *last_level
    }
}

impl super::Engine for Engine {
    fn start(&self) -> Result<(), BridgeError> {
        self.inner.started.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn run_code(&self, source: &str) -> Result<(), BridgeError> {
        if !self.inner.started.load(Ordering::Relaxed) {
            return Err(BridgeError::EngineRun("engine not started".to_string()));
        }
        if source.contains(RUN_FAIL_MARKER) {
            return Err(BridgeError::EngineRun(
                "mock engine refused to compile source".to_string(),
            ));
        }

        self.record(Call::RunCode(source.to_string()));
        self.print(&format!(
            "[{}] running {} bytes of source.",
            self.inner.name,
            source.len()
        ));
        Ok(())
    }

    fn set_float(&self, name: &str, value: f64) {
        self.record(Call::SetFloat(name.to_string(), value));
    }

    fn set_int(&self, name: &str, value: i64) {
        self.record(Call::SetInt(name.to_string(), value));
    }

    fn set_float_array(&self, name: &str, values: &[f32]) {
        self.record(Call::SetFloatArray(name.to_string(), values.to_vec()));
    }

    fn broadcast_event(&self, name: &str) {
        self.record(Call::BroadcastEvent(name.to_string()));
    }

    fn get_float(&self, name: &str) -> FloatRead {
        if !self.inner.started.load(Ordering::Relaxed) {
            return Box::pin(async {
                Err(BridgeError::EngineInit("engine not started".to_string()))
            });
        }

        let result = match name {
            MIC_LEVEL => Ok(self.mic_level()),
            _ => Err(BridgeError::EngineRun(format!("unknown global '{}'", name))),
        };
        Box::pin(async move { result })
    }

    fn set_print_callback(&self, callback: PrintCallback) {
        *self.inner.print.lock() = Some(callback);
    }

    fn connect_mic(&self, stream: Receiver<Vec<f32>>) {
        *self.inner.mic.lock() = Some(stream);
    }

    #[cfg(test)]
    fn to_mock(&self) -> Result<Arc<Engine>, Box<dyn std::error::Error>> {
        Ok(Arc::new(self.clone()))
    }
}
