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
use std::{error::Error, fmt, path::Path, sync::Arc};

mod exec;
mod mock;

/// A playback mechanism that can start a sound without waiting for it to
/// finish.
pub trait Player: fmt::Display + Send + Sync {
    /// Returns the name of the underlying player invocation.
    fn name(&self) -> String;

    /// Starts playing the given file, returning as soon as playback has been
    /// handed off. Completion, exit status, and failures after the handoff
    /// are neither tracked nor reported. Two triggers in quick succession
    /// must both be audible, so concurrent plays are expected to overlap.
    fn play(&self, path: &Path) -> Result<(), Box<dyn Error>>;
}

/// Gets a player that uses the given command.
pub fn get_player(command: &str) -> Result<Arc<dyn Player>, Box<dyn Error>> {
    if command.starts_with("mock") {
        return Ok(Arc::new(mock::Player::get(command)));
    };

    Ok(Arc::new(exec::Player::new(command)))
}
