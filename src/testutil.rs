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

//! Shared test fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Writes an interleaved f32 WAV file and returns its path.
pub fn write_wav(dir: &Path, name: &str, channels: u16, interleaved: &[f32]) -> PathBuf {
    let path = dir.join(name);
    let spec = hound::WavSpec {
        channels,
        sample_rate: 44100,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&path, spec).expect("failed to create wav");
    for sample in interleaved {
        writer.write_sample(*sample).expect("failed to write sample");
    }
    writer.finalize().expect("failed to finalize wav");
    path
}

/// Writes an engine script and returns its path.
pub fn write_script(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, source).expect("failed to write script");
    path
}

/// A config that bootstraps against the mock engine and mock microphone,
/// with a trivial script placed in the given directory.
pub fn mock_config(dir: &Path) -> Config {
    Config {
        engine: "mock".to_string(),
        mic_device: Some("mock".to_string()),
        script: write_script(dir, "main.ck", "// test session script\n"),
        ..Config::default()
    }
}
