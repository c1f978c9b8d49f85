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
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use duration_string::DurationString;
use serde::Deserialize;
use tracing::info;

use crate::engine::{Binding, Engine};
use crate::gpio::Edge;
use crate::sounds::{Category, Library};
use crate::{gpio, playback};

mod error;

pub use error::ConfigError;

/// The default input lines (BCM numbering) for the three categories.
pub const DEFAULT_HIT_LINE: u8 = 4;
pub const DEFAULT_WIN_LINE: u8 = 17;
pub const DEFAULT_LOSE_LINE: u8 = 27;

/// The default debounce window. Wide enough to swallow contact chatter,
/// narrower than any intentional rapid re-trigger.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1);

const DEFAULT_DEVICE: &str = "rppal";
const DEFAULT_PLAYER: &str = "aplay";
const DEFAULT_SOUND_DIR: &str = "/home/pi/shooting-gallery";

/// A YAML representation of the sound box configuration. Every field has a
/// default, so the box runs with no config file at all.
#[derive(Deserialize, Default)]
pub struct Config {
    /// The input device to use.
    device: Option<String>,

    /// The external playback command. Invoked with a resolved sound path as
    /// its sole argument.
    player: Option<String>,

    /// The directory containing all sound clips.
    sound_dir: Option<PathBuf>,

    /// The edge transition that counts as a trigger.
    #[serde(default)]
    edge: Edge,

    /// The debounce window, e.g. "1ms".
    debounce: Option<String>,

    /// The input lines for the three categories.
    #[serde(default)]
    lines: Lines,

    /// The clip inventory per category. Categories left out keep the stock
    /// inventory.
    #[serde(default)]
    sounds: HashMap<Category, Vec<String>>,
}

/// The line numbers bound to the three categories.
#[derive(Deserialize, Clone, Copy)]
pub struct Lines {
    /// The target hit line.
    #[serde(default = "default_hit_line")]
    pub hit: u8,

    /// The win condition line.
    #[serde(default = "default_win_line")]
    pub win: u8,

    /// The lose condition line.
    #[serde(default = "default_lose_line")]
    pub lose: u8,
}

impl Default for Lines {
    fn default() -> Lines {
        Lines {
            hit: DEFAULT_HIT_LINE,
            win: DEFAULT_WIN_LINE,
            lose: DEFAULT_LOSE_LINE,
        }
    }
}

fn default_hit_line() -> u8 {
    DEFAULT_HIT_LINE
}

fn default_win_line() -> u8 {
    DEFAULT_WIN_LINE
}

fn default_lose_line() -> u8 {
    DEFAULT_LOSE_LINE
}

impl Config {
    /// Loads the configuration from a YAML file.
    pub fn load(file: &Path) -> Result<Config, ConfigError> {
        Ok(serde_yml::from_str(&fs::read_to_string(file)?)?)
    }

    /// Gets the input device name.
    pub fn device(&self) -> &str {
        self.device.as_deref().unwrap_or(DEFAULT_DEVICE)
    }

    /// Gets the playback command.
    pub fn player(&self) -> &str {
        self.player.as_deref().unwrap_or(DEFAULT_PLAYER)
    }

    /// Gets the sound directory.
    pub fn sound_dir(&self) -> PathBuf {
        self.sound_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOUND_DIR))
    }

    /// Gets the trigger edge.
    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// Gets the debounce window.
    pub fn debounce(&self) -> Result<Duration, duration_string::Error> {
        self.debounce
            .as_ref()
            .map_or(Ok(DEFAULT_DEBOUNCE), |duration| {
                Ok(DurationString::from_string(duration.clone())?.into())
            })
    }

    /// Gets the line numbers.
    pub fn lines(&self) -> Lines {
        self.lines
    }

    /// Overrides the line numbers, typically from positional arguments.
    pub fn set_lines(&mut self, hit: u8, win: u8, lose: u8) {
        self.lines = Lines { hit, win, lose };
    }

    /// Gets the full clip inventory, falling back to the stock inventory for
    /// any category the configuration doesn't mention.
    pub fn sound_sets(&self) -> HashMap<Category, Vec<String>> {
        let mut sets = HashMap::new();
        for category in Category::ALL {
            let files = match self.sounds.get(&category) {
                Some(files) => files.clone(),
                None => stock_set(category),
            };
            sets.insert(category, files);
        }
        sets
    }
}

/// The inventory the gallery shipped with: 23 ricochets, 2 wins, 4 loses.
fn stock_set(category: Category) -> Vec<String> {
    let (prefix, count) = match category {
        Category::Hit => ("ricochet", 23),
        Category::Win => ("win", 2),
        Category::Lose => ("lose", 4),
    };
    (1..=count)
        .map(|number| format!("{}{}.wav", prefix, number))
        .collect()
}

/// Builds the sound library from the given configuration. Fails if any
/// category ends up with an empty sound set.
pub fn init_library(config: &Config) -> Result<Library, Box<dyn Error>> {
    Library::new(config.sound_dir(), config.sound_sets())
}

/// Initializes the dispatch engine from the given configuration. The engine
/// owns the armed line watchers and can be waited on until it exits.
/// Realistically, the engine is not expected to exit on its own.
pub fn init_engine(config: &Config) -> Result<Engine, Box<dyn Error>> {
    let device = gpio::get_device(config.device())?;
    let player = playback::get_player(config.player())?;
    info!(
        device = device.name(),
        player = player.name(),
        "Using drivers."
    );

    let library = Arc::new(init_library(config)?);
    let lines = config.lines();

    Engine::new(
        device,
        player,
        library,
        vec![
            Binding::new(Category::Hit, lines.hit),
            Binding::new(Category::Win, lines.win),
            Binding::new(Category::Lose, lines.lose),
        ],
        config.edge(),
        config.debounce()?,
    )
}

#[cfg(test)]
mod test {
    use std::error::Error;
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;

    use crate::gpio::Edge;
    use crate::sounds::Category;

    use super::Config;

    #[test]
    fn test_defaults() -> Result<(), Box<dyn Error>> {
        let config = Config::default();

        assert_eq!("rppal", config.device());
        assert_eq!("aplay", config.player());
        assert_eq!(
            PathBuf::from("/home/pi/shooting-gallery"),
            config.sound_dir()
        );
        assert_eq!(Edge::Falling, config.edge());
        assert_eq!(Duration::from_millis(1), config.debounce()?);

        let lines = config.lines();
        assert_eq!((4, 17, 27), (lines.hit, lines.win, lines.lose));

        let sets = config.sound_sets();
        assert_eq!(23, sets[&Category::Hit].len());
        assert_eq!(2, sets[&Category::Win].len());
        assert_eq!(4, sets[&Category::Lose].len());
        assert_eq!("ricochet23.wav", sets[&Category::Hit][22]);
        Ok(())
    }

    #[test]
    fn test_load() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("shotbox.yaml");
        fs::write(
            &file,
            r#"
player: mock-player
sound_dir: /srv/gallery
edge: rising
debounce: 5ms
lines:
  hit: 5
  win: 6
  lose: 13
sounds:
  win: [fanfare.wav]
"#,
        )?;

        let config = Config::load(&file)?;
        assert_eq!("mock-player", config.player());
        assert_eq!(PathBuf::from("/srv/gallery"), config.sound_dir());
        assert_eq!(Edge::Rising, config.edge());
        assert_eq!(Duration::from_millis(5), config.debounce()?);

        let lines = config.lines();
        assert_eq!((5, 6, 13), (lines.hit, lines.win, lines.lose));

        // The win set is overridden, the others keep the stock inventory.
        let sets = config.sound_sets();
        assert_eq!(vec!["fanfare.wav".to_string()], sets[&Category::Win]);
        assert_eq!(23, sets[&Category::Hit].len());
        assert_eq!(4, sets[&Category::Lose].len());
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load(&PathBuf::from("/does/not/exist.yaml")).is_err());
    }

    #[test]
    fn test_bad_debounce() -> Result<(), Box<dyn Error>> {
        let config: Config = serde_yml::from_str("debounce: quickly")?;
        assert!(config.debounce().is_err());
        Ok(())
    }

    #[test]
    fn test_set_lines() {
        let mut config = Config::default();
        config.set_lines(1, 2, 3);
        let lines = config.lines();
        assert_eq!((1, 2, 3), (lines.hit, lines.win, lines.lose));
    }

    #[test]
    fn test_empty_sound_set_rejected() -> Result<(), Box<dyn Error>> {
        let config: Config = serde_yml::from_str("sounds:\n  lose: []\n")?;
        assert!(super::init_library(&config).is_err());
        Ok(())
    }
}
