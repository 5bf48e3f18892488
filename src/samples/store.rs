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
use std::collections::HashMap;
use std::sync::Arc;

use crate::keys;

/// A trigger key's binding: the decoded mono sample and the name of the file
/// it came from. The sample data is immutable once stored; rebinding a key
/// replaces the whole binding.
#[derive(Clone)]
pub struct Binding {
    /// Mono f32 amplitude data, shared so a key press doesn't copy it.
    pub sample: Arc<Vec<f32>>,
    /// The original file name, for the mapping display.
    pub file_name: String,
}

/// In-memory mapping from trigger-key code to binding. At most one binding
/// per key at any time.
#[derive(Default)]
pub struct SampleStore {
    bindings: HashMap<u32, Binding>,
}

impl SampleStore {
    pub fn new() -> SampleStore {
        SampleStore::default()
    }

    /// Binds a sample to a trigger key, overwriting any prior binding.
    pub fn bind(&mut self, code: u32, sample: Vec<f32>, file_name: &str) {
        self.bindings.insert(
            code,
            Binding {
                sample: Arc::new(sample),
                file_name: file_name.to_string(),
            },
        );
    }

    /// Gets the binding for a key code, if there is one.
    pub fn get(&self, code: u32) -> Option<&Binding> {
        self.bindings.get(&code)
    }

    /// Rebuilds the full key-to-filename mapping display, in key table order.
    pub fn mapping_display(&self) -> String {
        keys::TRIGGER_KEYS
            .iter()
            .filter_map(|key| {
                self.bindings
                    .get(&key.code)
                    .map(|binding| format!("[{}] {}", key.label, binding.file_name))
            })
            .collect::<Vec<String>>()
            .join("  ")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bind_and_get() {
        let mut store = SampleStore::new();
        assert!(store.get(81).is_none());

        store.bind(81, vec![0.0, 0.5], "kick.wav");
        store.bind(87, vec![1.0], "snare.wav");

        assert_eq!("kick.wav", store.get(81).expect("no binding").file_name);
        assert_eq!("snare.wav", store.get(87).expect("no binding").file_name);
        assert!(store.get(70).is_none());
    }

    #[test]
    fn test_rebind_replaces() {
        let mut store = SampleStore::new();
        store.bind(81, vec![0.0, 0.5], "kick.wav");
        store.bind(81, vec![1.0], "clap.wav");

        let binding = store.get(81).expect("no binding");
        assert_eq!("clap.wav", binding.file_name);
        assert_eq!(vec![1.0], *binding.sample.as_ref());
        assert_eq!("[Q] clap.wav", store.mapping_display());
    }

    #[test]
    fn test_mapping_display_follows_key_table_order() {
        let mut store = SampleStore::new();
        // Bound out of order; the display follows the fixed table order.
        store.bind(68, vec![0.0], "hat.wav");
        store.bind(81, vec![0.0], "kick.wav");

        assert_eq!("[Q] kick.wav  [D] hat.wav", store.mapping_display());
    }
}
