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
mod config;
mod controller;
mod engine;
mod error;
mod keys;
mod mic;
mod samples;
mod session;
mod status;
#[cfg(test)]
mod testutil;
mod util;

use clap::{crate_version, Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[clap(
    version = crate_version!(),
    about = "A keyboard-driven live sampler bridge."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Starts a live session: microphone, engine, script, keyboard control.
    Start {
        /// The path to the bridge config. Built-in defaults when omitted.
        config_path: Option<String>,
    },
    /// Lists the available audio input devices.
    Devices {},
    /// Decodes the given files and prints the key mapping they would produce.
    Check {
        /// Audio files, bound in order to the trigger keys.
        files: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start { config_path } => {
            let config = match config_path {
                Some(path) => config::load(&PathBuf::from(path))?,
                None => config::Config::default(),
            };

            let session = session::Session::bootstrap(&config)?;
            let status = session.status();
            let _monitor = status::spawn_level_monitor(
                session.engine(),
                Arc::clone(&status),
                config.mic_threshold,
            );

            let mut controller = controller::Controller::new(
                session,
                Arc::new(controller::keyboard::Driver::new()),
            )?;
            controller.join().await?;
        }
        Commands::Devices {} => {
            let devices = mic::list_devices()?;

            if devices.is_empty() {
                println!("No input devices found.");
                return Ok(());
            }

            println!("Input devices:");
            for device in devices {
                println!("- {}", device);
            }
        }
        Commands::Check { files } => {
            let mut store = samples::SampleStore::new();

            for (position, file) in files.iter().enumerate() {
                let key = match keys::by_position(position) {
                    Some(key) => key,
                    None => {
                        println!("Ignoring {} extra file(s).", files.len() - position);
                        break;
                    }
                };

                let path = Path::new(file);
                match samples::decode_file(path) {
                    Ok(decoded) => {
                        let mono = samples::mix_to_mono(&decoded.samples, decoded.channels);
                        println!(
                            "- [{}] {} ({} samples @ {}Hz, {} channel(s))",
                            key.label,
                            file,
                            mono.len(),
                            decoded.sample_rate,
                            decoded.channels,
                        );
                        store.bind(key.code, mono, util::filename_display(path));
                    }
                    Err(e) => println!("- {}", e),
                }
            }

            println!("Mapping: {}", store.mapping_display());
        }
    }

    Ok(())
}
