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
use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, span, warn, Instrument, Level};

use crate::gpio::{self, Edge, LineEvent};
use crate::playback;
use crate::sounds::{Category, Library};

/// Binds one input line to one event category for the life of the process.
#[derive(Clone, Copy, Debug)]
pub struct Binding {
    category: Category,
    line: u8,
}

impl Binding {
    /// Creates a new binding.
    pub fn new(category: Category, line: u8) -> Binding {
        Binding { category, line }
    }
}

/// Per-line debounce. A line is either armed or inside its debounce window:
/// the first qualifying edge fires and opens the window, edges arriving
/// before the window elapses are coalesced into the event that opened it.
/// The window only swallows contact chatter; intentional rapid triggers land
/// outside it and each fire.
struct Debounce {
    window: Duration,
    rearm_at: HashMap<u8, Instant>,
}

impl Debounce {
    fn new(window: Duration) -> Debounce {
        Debounce {
            window,
            rearm_at: HashMap::new(),
        }
    }

    /// Returns true if the edge at the given instant should fire the line's
    /// handler. Lines debounce independently of each other.
    fn admit(&mut self, line: u8, at: Instant) -> bool {
        if self
            .rearm_at
            .get(&line)
            .is_some_and(|rearm_at| at < *rearm_at)
        {
            return false;
        }
        self.rearm_at.insert(line, at + self.window);
        true
    }
}

/// The dispatch engine. Arms an edge watcher per binding and turns every
/// debounced edge into a fire-and-forget playback of a randomly drawn clip
/// from the triggering category's sound set.
pub struct Engine {
    device: Arc<dyn gpio::Device>,
    handle: JoinHandle<()>,
}

impl Engine {
    /// Creates a new engine and arms all of its watchers. If any line can't
    /// be subscribed, this fails before the engine starts dispatching: the
    /// box never runs partially armed.
    pub fn new(
        device: Arc<dyn gpio::Device>,
        player: Arc<dyn playback::Player>,
        library: Arc<Library>,
        bindings: Vec<Binding>,
        edge: Edge,
        debounce: Duration,
    ) -> Result<Engine, Box<dyn Error>> {
        let mut categories: HashMap<u8, Category> = HashMap::new();
        for binding in &bindings {
            if categories.insert(binding.line, binding.category).is_some() {
                return Err(format!("line {} is bound more than once", binding.line).into());
            }
        }

        let (events_tx, events_rx) = mpsc::channel(64);
        for binding in &bindings {
            device.watch_line(binding.line, edge, events_tx.clone())?;
            info!(
                category = binding.category.to_string(),
                line = binding.line,
                edge = edge.to_string(),
                "Armed watcher."
            );
        }

        Ok(Engine {
            device: Arc::clone(&device),
            handle: tokio::spawn(
                Engine::dispatch_events(events_rx, categories, library, player, debounce)
                    .instrument(span!(Level::INFO, "dispatch")),
            ),
        })
    }

    /// Join will block until the engine finishes. Realistically it doesn't
    /// finish until the watchers' event channel closes.
    pub async fn join(&mut self) -> Result<(), JoinError> {
        (&mut self.handle).await
    }

    /// Stops dispatching and releases all line resources. Safe to call more
    /// than once, and also runs on drop so the lines are returned on every
    /// exit path, including an interrupt during the indefinite wait.
    pub fn release(&self) {
        self.handle.abort();
        self.device.release();
    }

    /// Turns line events into playback requests. Each debounced event is
    /// handled on its own task so that nothing here can hold up the watchers,
    /// and a failing handler can't take its line's watcher down with it.
    async fn dispatch_events(
        mut events_rx: mpsc::Receiver<LineEvent>,
        categories: HashMap<u8, Category>,
        library: Arc<Library>,
        player: Arc<dyn playback::Player>,
        window: Duration,
    ) {
        let mut debounce = Debounce::new(window);
        while let Some(event) = events_rx.recv().await {
            let Some(category) = categories.get(&event.line).copied() else {
                warn!(line = event.line, "Edge on an unbound line.");
                continue;
            };
            if !debounce.admit(event.line, Instant::now()) {
                continue;
            }

            info!(
                category = category.to_string(),
                line = event.line,
                "Triggered."
            );

            let library = Arc::clone(&library);
            let player = Arc::clone(&player);
            tokio::spawn(async move {
                let file = library.select(category);
                if let Err(e) = player.play(&library.resolve(&file)) {
                    error!(
                        category = category.to_string(),
                        file,
                        err = e.to_string(),
                        "Error starting playback."
                    );
                }
            });
        }

        info!("Dispatch engine closing.");
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.release();
    }
}
