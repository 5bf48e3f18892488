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

//! Key-triggered sample handling.
//!
//! This module provides:
//! - Decoding uploaded audio files into mono f32 data (in-memory, so a key
//!   press can ship the whole buffer to the engine immediately)
//! - The store binding trigger keys to decoded samples

pub mod decoder;
pub mod store;

pub use decoder::{decode_file, mix_to_mono};
pub use store::{Binding, SampleStore};
