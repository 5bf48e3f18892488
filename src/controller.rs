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
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tracing::{info, span, Level};

use crate::session::Session;

pub mod keyboard;

/// Input events that will trigger behavior in the session.
#[derive(Debug, PartialEq)]
pub enum Event {
    /// A key-down, with the host's auto-repeat flag.
    Key { code: u32, repeat: bool },

    /// An upload batch of files to decode and bind to trigger keys.
    LoadFiles(Vec<PathBuf>),

    /// A tempo control change, as entered. Validation happens in the session.
    Tempo(String),
}

pub trait Driver: Send + Sync + 'static {
    fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>>;
}

/// Dispatches input events into a live session.
pub struct Controller {
    handle: JoinHandle<()>,
}

impl Controller {
    /// Creates a new controller with the given driver. The controller owns
    /// the session for the rest of its life.
    pub fn new(session: Session, driver: Arc<dyn Driver>) -> Result<Controller, Box<dyn Error>> {
        Ok(Controller {
            handle: tokio::spawn(async move { Controller::trigger_events(session, driver).await }),
        })
    }

    /// Join will block until the controller finishes.
    pub async fn join(&mut self) -> Result<(), JoinError> {
        (&mut self.handle).await
    }

    /// Dispatches session operations by watching the driver and getting
    /// events from it. Events are handled strictly one at a time, so the
    /// engine calls for one keypress finish before the next keypress's begin,
    /// and batch decodes cannot interleave with key lookups.
    async fn trigger_events(mut session: Session, driver: Arc<dyn Driver>) {
        let span = span!(Level::INFO, "controller");
        let _enter = span.enter();

        let (events_tx, mut events_rx) = mpsc::channel(1);
        let join_handle = driver.monitor_events(events_tx);

        info!("Controller started.");

        loop {
            if let Some(event) = events_rx.recv().await {
                info!(event = format!("{:?}", event), "Received event.");

                match event {
                    Event::Key { code, repeat } => session.handle_key(code, repeat),
                    Event::LoadFiles(paths) => session.load_batch(&paths),
                    Event::Tempo(text) => session.set_tempo(&text),
                }
            } else {
                info!("Controller closing.");
                if let Err(e) = join_handle.await {
                    tracing::error!("Error waiting for event monitor to stop: {}", e);
                }
                return;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::{error::Error, io, sync::Arc};

    use parking_lot::Mutex;
    use tokio::{sync::mpsc::Sender, task::JoinHandle};

    use crate::engine::mock::Call;
    use crate::engine::{BPM, LOAD_BUFFER, LOAD_BUFFER_SIZE, LOAD_BUFFER_TRIGGER};
    use crate::session::Session;
    use crate::testutil;

    use super::{Driver, Event};

    /// A driver that forwards a scripted sequence of events, then closes.
    struct TestDriver {
        events: Mutex<Option<crossbeam_channel::Receiver<Event>>>,
    }

    impl TestDriver {
        fn new() -> (TestDriver, crossbeam_channel::Sender<Event>) {
            let (tx, rx) = crossbeam_channel::unbounded();
            (
                TestDriver {
                    events: Mutex::new(Some(rx)),
                },
                tx,
            )
        }
    }

    impl Driver for TestDriver {
        fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>> {
            let events = self
                .events
                .lock()
                .take()
                .expect("monitor_events called twice");
            tokio::task::spawn_blocking(move || {
                for event in events.iter() {
                    events_tx
                        .blocking_send(event)
                        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
                }
                Ok(())
            })
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_controller() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let config = testutil::mock_config(dir.path());
        let session = Session::bootstrap(&config)?;
        let mock = session.engine().to_mock()?;
        let status = session.status();
        mock.clear_calls();

        let kick = testutil::write_wav(dir.path(), "kick.wav", 1, &[0.25, -0.25]);
        let snare = testutil::write_wav(dir.path(), "snare.wav", 1, &[1.0]);

        let (driver, events) = TestDriver::new();
        let mut controller = super::Controller::new(session, Arc::new(driver))?;

        events.send(Event::LoadFiles(vec![kick, snare]))?;
        events.send(Event::Key {
            code: 81,
            repeat: false,
        })?;
        events.send(Event::Key {
            code: 81,
            repeat: true,
        })?;
        events.send(Event::Tempo("120".to_string()))?;
        drop(events);

        controller.join().await?;

        assert_eq!("[Q] kick.wav  [W] snare.wav", status.mapping());

        let calls = mock.calls();
        assert_eq!(
            vec![
                Call::SetFloatArray(LOAD_BUFFER.to_string(), vec![0.25, -0.25]),
                Call::SetInt(LOAD_BUFFER_SIZE.to_string(), 2),
                Call::BroadcastEvent(LOAD_BUFFER_TRIGGER.to_string()),
                // The repeated key-down produced nothing; the tempo follows.
                Call::SetFloat(BPM.to_string(), 120.0),
            ],
            calls
        );
        Ok(())
    }
}
