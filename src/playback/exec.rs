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
use std::{
    error::Error,
    fmt,
    path::Path,
    process::{Command, Stdio},
    thread,
};

use tracing::debug;

/// A player that spawns an external playback command (aplay by default) for
/// every requested sound.
pub struct Player {
    command: String,
}

impl Player {
    pub fn new(command: &str) -> Player {
        Player {
            command: command.to_string(),
        }
    }
}

impl super::Player for Player {
    fn name(&self) -> String {
        self.command.clone()
    }

    /// Spawns the playback command with the path as its sole argument and no
    /// stdio attached, then returns. The child is handed to a detached reaper
    /// thread so finished plays don't linger as zombies.
    fn play(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        let mut child = Command::new(&self.command)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        debug!(
            command = self.command,
            path = path.display().to_string(),
            "Spawned player."
        );

        thread::spawn(move || {
            let _ = child.wait();
        });

        Ok(())
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (exec)", self.command)
    }
}
