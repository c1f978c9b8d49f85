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
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread,
    time::Duration,
};

/// A mock player. Doesn't actually play anything, but simulates an in-flight
/// external playback process of a configurable duration.
#[derive(Clone)]
pub struct Player {
    name: String,
    delay: Arc<Mutex<Duration>>,
    started: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
    plays: Arc<Mutex<Vec<PathBuf>>>,
}

impl Player {
    /// Gets the given mock player.
    pub fn get(name: &str) -> Player {
        Player {
            name: name.to_string(),
            delay: Arc::new(Mutex::new(Duration::ZERO)),
            started: Arc::new(AtomicUsize::new(0)),
            completed: Arc::new(AtomicUsize::new(0)),
            plays: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[cfg(test)]
    /// Makes every subsequent play take the given duration to complete.
    pub fn set_delay(&self, delay: Duration) {
        let mut mutex_delay = self.delay.lock().expect("unable to get delay lock");
        *mutex_delay = delay;
    }

    #[cfg(test)]
    /// The number of plays that have been started.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    /// The number of plays that have run to completion.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    /// The paths of all completed plays, in completion order.
    pub fn plays(&self) -> Vec<PathBuf> {
        self.plays
            .lock()
            .expect("unable to get plays lock")
            .to_vec()
    }
}

impl super::Player for Player {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn play(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        self.started.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().expect("unable to get delay lock");
        let path = path.to_path_buf();
        let plays = self.plays.clone();
        let completed = self.completed.clone();
        thread::spawn(move || {
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            plays.lock().expect("unable to get plays lock").push(path);
            completed.fetch_add(1, Ordering::SeqCst);
        });

        Ok(())
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name)
    }
}
