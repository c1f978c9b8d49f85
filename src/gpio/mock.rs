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
    collections::HashMap,
    error::Error,
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use tokio::sync::mpsc::Sender;

use super::{Edge, LineEvent};

/// A mock input device. Lines don't exist; tests pulse them by hand.
#[derive(Clone)]
pub struct Device {
    name: String,
    senders: Arc<Mutex<HashMap<u8, Sender<LineEvent>>>>,
    releases: Arc<AtomicUsize>,
}

impl Device {
    /// Gets the given mock device.
    pub fn get(name: &str) -> Device {
        Device {
            name: name.to_string(),
            senders: Arc::new(Mutex::new(HashMap::new())),
            releases: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[cfg(test)]
    /// Simulates a qualifying edge on the given line.
    pub fn pulse(&self, line: u8) {
        let senders = self.senders.lock().expect("unable to get senders lock");
        senders
            .get(&line)
            .expect("line is not watched")
            .try_send(LineEvent { line })
            .expect("error sending event");
    }

    #[cfg(test)]
    /// The lines currently being watched, sorted.
    pub fn watched_lines(&self) -> Vec<u8> {
        let senders = self.senders.lock().expect("unable to get senders lock");
        let mut lines: Vec<u8> = senders.keys().copied().collect();
        lines.sort();
        lines
    }

    #[cfg(test)]
    /// The number of times the device's lines have actually been torn down.
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

impl super::Device for Device {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn watch_line(
        &self,
        line: u8,
        _edge: Edge,
        sender: Sender<LineEvent>,
    ) -> Result<(), Box<dyn Error>> {
        let mut senders = self.senders.lock().expect("unable to get senders lock");
        if senders.contains_key(&line) {
            return Err(format!("line {} is already watched", line).into());
        }
        senders.insert(line, sender);
        Ok(())
    }

    fn release(&self) {
        let mut senders = self.senders.lock().expect("unable to get senders lock");
        if !senders.is_empty() {
            senders.clear();
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}
