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
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// The configuration for the sampler bridge.
#[derive(Deserialize, Clone)]
pub struct Config {
    /// The engine to drive. Names beginning with "mock" select the built-in
    /// mock engine.
    #[serde(default = "default_engine")]
    pub engine: String,

    /// The input device to capture from. Host default when unset.
    #[serde(default)]
    pub mic_device: Option<String>,

    /// The engine script to load and run during bootstrap.
    #[serde(default = "default_script")]
    pub script: PathBuf,

    /// Mic levels above this light the mic-active indicator. Cosmetic.
    #[serde(default = "default_mic_threshold")]
    pub mic_threshold: f32,

    /// A starting tempo to push to the engine once the script is running.
    #[serde(default)]
    pub bpm: Option<f64>,
}

fn default_engine() -> String {
    "mock".to_string()
}

fn default_script() -> PathBuf {
    PathBuf::from("main.ck")
}

fn default_mic_threshold() -> f32 {
    0.06
}

impl Default for Config {
    fn default() -> Config {
        Config {
            engine: default_engine(),
            mic_device: None,
            script: default_script(),
            mic_threshold: default_mic_threshold(),
            bpm: None,
        }
    }
}

/// Parses a config from a YAML file.
pub fn load(path: &Path) -> Result<Config, Box<dyn Error>> {
    let config: Config = serde_yml::from_str(&fs::read_to_string(path)?)?;
    Ok(config)
}
