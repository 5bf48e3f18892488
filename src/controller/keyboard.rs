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
use std::io;
use std::path::PathBuf;

use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tracing::{info, span, warn, Level};

use crate::keys;

use super::Event;

const LOAD: &str = "load";
const TEMPO: &str = "bpm";
const QUIT: &str = "quit";

/// A line-oriented keyboard driver on stdin. A bare key token (`q`, `81`) is
/// a key-down; a `!` suffix (`q!`) marks it as auto-repeat, for parity with
/// hosts that report key repeats.
pub struct Driver {}

impl Driver {
    pub fn new() -> Driver {
        Driver {}
    }

    /// Reads and dispatches one line. Returns false when input is exhausted
    /// or the user quits.
    fn monitor_io<R, W>(
        events_tx: &Sender<Event>,
        mut reader: R,
        mut writer: W,
    ) -> Result<bool, io::Error>
    where
        R: io::BufRead,
        W: io::Write,
    {
        write!(
            writer,
            "Input (<key>, {} <files>, {} <value>, {}): ",
            LOAD, TEMPO, QUIT,
        )?;
        writer.flush()?;
        let mut input: String = String::default();
        if reader.read_line(&mut input)? == 0 {
            return Ok(false);
        }

        let input = input.trim();
        let (command, rest) = input.split_once(' ').unwrap_or((input, ""));

        match command.to_lowercase().as_str() {
            "" => {}
            QUIT => return Ok(false),
            LOAD => {
                let paths: Vec<PathBuf> = rest.split_whitespace().map(PathBuf::from).collect();
                if paths.is_empty() {
                    warn!("No files given to load.");
                } else {
                    Self::send(events_tx, Event::LoadFiles(paths))?;
                }
            }
            TEMPO => Self::send(events_tx, Event::Tempo(rest.to_string()))?,
            key => {
                let (token, repeat) = match key.strip_suffix('!') {
                    Some(token) => (token, true),
                    None => (key, false),
                };
                match keys::code_for_token(token) {
                    Some(code) => Self::send(events_tx, Event::Key { code, repeat })?,
                    None => warn!(input = input, "Unrecognized input"),
                }
            }
        }
        Ok(true)
    }

    fn send(events_tx: &Sender<Event>, event: Event) -> Result<(), io::Error> {
        events_tx
            .blocking_send(event)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

impl Default for Driver {
    fn default() -> Driver {
        Driver::new()
    }
}

impl super::Driver for Driver {
    fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>> {
        tokio::task::spawn_blocking(move || {
            let span = span!(Level::INFO, "keyboard driver");
            let _enter = span.enter();

            info!("Keyboard driver started.");

            loop {
                if !Self::monitor_io(&events_tx, io::stdin().lock(), io::stdout())? {
                    info!("Keyboard driver closing.");
                    return Ok(());
                }
            }
        })
    }
}

#[cfg(test)]
mod test {
    use std::io::{self, BufReader, BufWriter};
    use std::path::PathBuf;

    use tokio::sync::mpsc;

    use crate::controller::Event;

    use super::Driver;

    fn get_event(line: &str) -> Result<(Option<Event>, bool), io::Error> {
        let (sender, mut receiver) = mpsc::channel::<Event>(1);

        let reader = BufReader::new(line.as_bytes());
        let writer = BufWriter::new(Vec::new());
        let proceed = Driver::monitor_io(&sender, reader, writer)?;

        // Force the sender to close.
        drop(sender);
        Ok((receiver.blocking_recv(), proceed))
    }

    #[test]
    fn test_keyboard_events() -> Result<(), io::Error> {
        assert_eq!(
            (
                Some(Event::Key {
                    code: 81,
                    repeat: false
                }),
                true
            ),
            get_event("q")?
        );
        assert_eq!(
            (
                Some(Event::Key {
                    code: 81,
                    repeat: true
                }),
                true
            ),
            get_event("q!")?
        );
        assert_eq!(
            (
                Some(Event::Key {
                    code: 70,
                    repeat: false
                }),
                true
            ),
            get_event("F")?
        );
        assert_eq!(
            (
                Some(Event::Key {
                    code: 81,
                    repeat: false
                }),
                true
            ),
            get_event("81")?
        );
        assert_eq!(
            (
                Some(Event::LoadFiles(vec![
                    PathBuf::from("kick.wav"),
                    PathBuf::from("snare.wav")
                ])),
                true
            ),
            get_event("load kick.wav snare.wav")?
        );
        assert_eq!(
            (Some(Event::Tempo("120".to_string())), true),
            get_event("bpm 120")?
        );
        assert_eq!((None, true), get_event("unrecognized")?);
        assert_eq!((None, true), get_event("load")?);
        assert_eq!((None, true), get_event("\n")?);
        // EOF and an explicit quit both stop the driver.
        assert_eq!((None, false), get_event("")?);
        assert_eq!((None, false), get_event("quit")?);
        Ok(())
    }
}
