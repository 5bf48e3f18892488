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
use std::fmt;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, span, Level};

use crate::engine::{Engine, MIC_LEVEL};

/// One visual frame, the cadence of the level monitor.
const LEVEL_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Session lifecycle state, as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Idle,
    InitializingAudio,
    StartingEngine,
    LoadingScript(String),
    Running,
    Error(String),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => write!(f, "Status: Idle"),
            Status::InitializingAudio => write!(f, "Status: Initializing Audio..."),
            Status::StartingEngine => write!(f, "Status: Starting Engine..."),
            Status::LoadingScript(script) => write!(f, "Status: Loading {}...", script),
            Status::Running => write!(f, "Status: RUNNING"),
            Status::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

/// The user-visible surfaces of the bridge: lifecycle status, the mic-active
/// indicator, the key-to-filename mapping display, and an append-only console.
/// Everything also flows through tracing so a terminal session sees it live.
pub struct StatusBoard {
    status: Mutex<Status>,
    mic_active: AtomicBool,
    mapping: Mutex<String>,
    console: Mutex<Vec<String>>,
}

impl StatusBoard {
    pub fn new() -> StatusBoard {
        StatusBoard {
            status: Mutex::new(Status::Idle),
            mic_active: AtomicBool::new(false),
            mapping: Mutex::new(String::new()),
            console: Mutex::new(Vec::new()),
        }
    }

    pub fn set_status(&self, status: Status) {
        info!(status = %status, "Status changed.");
        *self.status.lock() = status;
    }

    pub fn status(&self) -> Status {
        self.status.lock().clone()
    }

    pub fn set_mic_active(&self, active: bool) {
        self.mic_active.store(active, Ordering::Relaxed);
    }

    pub fn mic_active(&self) -> bool {
        self.mic_active.load(Ordering::Relaxed)
    }

    /// Replaces the whole mapping display. Rebuilt per upload batch rather
    /// than diffed.
    pub fn set_mapping(&self, mapping: String) {
        info!(mapping, "Key mapping updated.");
        *self.mapping.lock() = mapping;
    }

    pub fn mapping(&self) -> String {
        self.mapping.lock().clone()
    }

    /// Appends a line to the console. The console only ever grows.
    pub fn log(&self, line: &str) {
        info!(target: "console", "{}", line);
        self.console.lock().push(line.to_string());
    }

    pub fn console(&self) -> Vec<String> {
        self.console.lock().clone()
    }
}

impl Default for StatusBoard {
    fn default() -> StatusBoard {
        StatusBoard::new()
    }
}

/// Spawns the mic-level monitor: polls the engine's `micLevel` once per frame
/// and toggles the indicator against the configured threshold. Read failures
/// mean "engine not ready" and are swallowed; the loop reschedules regardless
/// and runs for the life of the process.
pub fn spawn_level_monitor(
    engine: Arc<dyn Engine>,
    status: Arc<StatusBoard>,
    threshold: f32,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let span = span!(Level::INFO, "level monitor");
        let _enter = span.enter();

        loop {
            if let Ok(level) = engine.get_float(MIC_LEVEL).await {
                status.set_mic_active(level > threshold);
            }
            tokio::time::sleep(LEVEL_POLL_INTERVAL).await;
        }
    })
}
