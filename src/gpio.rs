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
use std::{error::Error, fmt, sync::Arc};

use serde::Deserialize;
use tokio::sync::mpsc::Sender;

mod mock;
mod rppal;

/// The edge transition that qualifies as a trigger on an input line.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// High to low. The gallery's switches pull their lines to ground, so
    /// this is the default.
    #[default]
    Falling,
    /// Low to high.
    Rising,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Falling => write!(f, "falling"),
            Edge::Rising => write!(f, "rising"),
        }
    }
}

/// A raw edge notification from a digital input line. Debouncing happens
/// downstream in the dispatch engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineEvent {
    /// The BCM channel number the edge occurred on.
    pub line: u8,
}

/// A digital input device that can report edge transitions on its lines.
pub trait Device: fmt::Display + Send + Sync {
    /// Returns the name of the device.
    fn name(&self) -> String;

    /// Subscribes to the given edge on the given line and forwards every
    /// transition to the sender. Notifications are delivered on an execution
    /// context owned by the device, not by the caller. Subscription failures
    /// (invalid line, permissions, hardware absent) are startup-fatal; there
    /// is no polling fallback.
    fn watch_line(&self, line: u8, edge: Edge, sender: Sender<LineEvent>)
        -> Result<(), Box<dyn Error>>;

    /// Releases every line claimed by watch_line, returning the lines to
    /// their unclaimed state. Safe to call more than once.
    fn release(&self);
}

/// Gets a device with the given name.
pub fn get_device(name: &str) -> Result<Arc<dyn Device>, Box<dyn Error>> {
    if name.starts_with("mock") {
        return Ok(Arc::new(mock::Device::get(name)));
    };

    Ok(Arc::new(rppal::Device::new()?))
}
