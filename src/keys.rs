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
/// A trigger key: a fixed key code paired with a display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerKey {
    pub code: u32,
    pub label: char,
}

/// The fixed, ordered set of keys that uploaded files bind to. The first file
/// in a batch binds to Q, the second to W, and so on. Files beyond the sixth
/// are ignored.
pub const TRIGGER_KEYS: [TriggerKey; 6] = [
    TriggerKey { code: 81, label: 'Q' },
    TriggerKey { code: 87, label: 'W' },
    TriggerKey { code: 69, label: 'E' },
    TriggerKey { code: 65, label: 'A' },
    TriggerKey { code: 83, label: 'S' },
    TriggerKey { code: 68, label: 'D' },
];

/// Returns the trigger key for the given batch position, if there is one.
pub fn by_position(position: usize) -> Option<TriggerKey> {
    TRIGGER_KEYS.get(position).copied()
}

/// Resolves a user-entered token into a key code. Accepts a raw numeric code
/// (`81`) or a single alphanumeric character (`q`), which maps to its
/// uppercase ASCII value the way browser key codes do.
pub fn code_for_token(token: &str) -> Option<u32> {
    if let Ok(code) = token.parse::<u32>() {
        return Some(code);
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Some(c.to_ascii_uppercase() as u32),
        _ => None,
    }
}
