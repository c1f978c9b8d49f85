// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
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
mod engine;
mod gpio;
mod playback;
mod sounds;

use std::error::Error;
use std::path::PathBuf;

use clap::{crate_version, Parser, Subcommand};
use tokio::signal;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::sounds::Category;

const SYSTEMD_SERVICE: &str = r#"
[Unit]
Description=shooting gallery sound box

[Service]
Type=simple
Restart=on-failure
EnvironmentFile=-/etc/default/shotbox
ExecStart=/usr/local/bin/shotbox start $SHOTBOX_LINES
ExecReload=/bin/kill -HUP $MAINPID

[Install]
WantedBy=multi-user.target
Alias=shotbox.service
"#;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A shooting gallery sound box."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Arms the input lines and plays sounds until interrupted.
    Start {
        /// The hit, win, and lose line numbers (BCM). Give all three or none.
        #[arg(num_args = 0..=3, value_name = "LINE")]
        lines: Vec<String>,

        /// The path to the sound box config.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Lists the configured sound inventory and reports missing files.
    Sounds {
        /// The path to the sound box config.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Prints a systemd service definition to stdout.
    Systemd {},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start { lines, config } => {
            let mut config = load_config(config)?;
            match parse_lines(&lines) {
                Some((hit, win, lose)) => config.set_lines(hit, win, lose),
                None if lines.is_empty() => {}
                None => warn!(
                    args = lines.join(" "),
                    "Ignoring malformed line arguments, using defaults."
                ),
            }

            let lines = config.lines();
            info!(
                hit = lines.hit,
                win = lines.win,
                lose = lines.lose,
                "Starting shotbox."
            );

            // All real work happens on the watchers from here on. The main
            // path just waits for a termination signal, then returns the
            // lines on the way out.
            let mut engine = config::init_engine(&config)?;
            tokio::select! {
                _ = signal::ctrl_c() => info!("Interrupted, shutting down."),
                result = engine.join() => {
                    if let Err(e) = result {
                        error!(err = e.to_string(), "Dispatch engine stopped unexpectedly.");
                    }
                }
            }
            engine.release();
        }
        Commands::Sounds { config } => {
            let config = load_config(config)?;
            let library = config::init_library(&config)?;

            for category in Category::ALL {
                let files = library.files(category);
                println!("{} (count: {}):", category, files.len());
                for file in files {
                    println!("- {}", file);
                }
            }

            let missing = library.missing();
            if missing.is_empty() {
                println!("\nAll sounds present in {}.", library.sound_dir().display());
            } else {
                println!("\nMissing files (count: {}):", missing.len());
                for path in missing {
                    println!("- {}", path.display());
                }
            }
        }
        Commands::Systemd {} => {
            println!("{}", SYSTEMD_SERVICE)
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<Config, Box<dyn Error>> {
    match path {
        Some(path) => Ok(Config::load(&path)?),
        None => Ok(Config::default()),
    }
}

/// Resolves the positional line arguments. Anything short of three parseable
/// line numbers keeps the stock lines, matching how the box has always
/// shrugged off a bad invocation.
fn parse_lines(lines: &[String]) -> Option<(u8, u8, u8)> {
    match lines {
        [hit, win, lose] => Some((hit.parse().ok()?, win.parse().ok()?, lose.parse().ok()?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::config::Config;

    use super::{parse_lines, Cli, Commands};

    fn to_args(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_parse_lines() {
        assert_eq!(Some((4, 17, 27)), parse_lines(&to_args(&["4", "17", "27"])));
        assert_eq!(None, parse_lines(&to_args(&[])));
        assert_eq!(None, parse_lines(&to_args(&["4", "17"])));
        assert_eq!(None, parse_lines(&to_args(&["four", "17", "27"])));
        assert_eq!(None, parse_lines(&to_args(&["4", "17", "300"])));
    }

    #[test]
    fn test_malformed_lines_fall_back_to_defaults() {
        // A bad set must make it past the CLI parser and then be ignored in
        // favor of the stock lines, not abort startup.
        let cli = Cli::try_parse_from(["shotbox", "start", "four", "17", "27"])
            .expect("malformed line arguments were rejected");
        let Commands::Start { lines, .. } = cli.command else {
            panic!("expected the start command");
        };

        let mut config = Config::default();
        match parse_lines(&lines) {
            Some((hit, win, lose)) => config.set_lines(hit, win, lose),
            None => {}
        }
        let resolved = config.lines();
        assert_eq!((4, 17, 27), (resolved.hit, resolved.win, resolved.lose));
    }

    #[test]
    fn test_partial_lines_fall_back_to_defaults() {
        let cli = Cli::try_parse_from(["shotbox", "start", "5", "6"])
            .expect("partial line arguments were rejected");
        let Commands::Start { lines, .. } = cli.command else {
            panic!("expected the start command");
        };
        assert_eq!(None, parse_lines(&lines));
    }
}
