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

/// Errors raised while bridging the microphone, sample files, and the engine.
///
/// The first four variants are fatal to session bootstrap and require a full
/// manual retry. `Decode` is per-file: it is logged and the rest of the batch
/// continues. Engine and OS message text is carried through verbatim.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Microphone access failed: {0}")]
    Permission(String),

    #[error("Engine failed to start: {0}")]
    EngineInit(String),

    #[error("Failed to load script '{path}': {message}")]
    ResourceLoad { path: String, message: String },

    #[error("Engine failed to run script: {0}")]
    EngineRun(String),

    #[error("Failed to decode '{file}': {message}")]
    Decode { file: String, message: String },
}
