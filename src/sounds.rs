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
use std::fmt;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use serde::Deserialize;

/// The game events the gallery can produce. Each category has its own input
/// line and its own sound vocabulary.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A target was hit.
    Hit,
    /// The win condition was reached.
    Win,
    /// The lose condition was reached.
    Lose,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Hit, Category::Win, Category::Lose];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Hit => write!(f, "HIT"),
            Category::Win => write!(f, "WIN"),
            Category::Lose => write!(f, "LOSE"),
        }
    }
}

/// An immutable registry of sound clips, one non-empty set per category.
/// Built once at startup and shared read-only across all handler invocations.
pub struct Library {
    sound_dir: PathBuf,
    sets: HashMap<Category, Vec<String>>,
}

impl Library {
    /// Creates a new library. Every category must have at least one clip,
    /// otherwise selection would have no valid choice.
    pub fn new(
        sound_dir: PathBuf,
        sets: HashMap<Category, Vec<String>>,
    ) -> Result<Library, Box<dyn Error>> {
        for category in Category::ALL {
            if !sets.get(&category).is_some_and(|files| !files.is_empty()) {
                return Err(format!("no sounds configured for category {}", category).into());
            }
        }

        Ok(Library { sound_dir, sets })
    }

    /// Draws one clip uniformly at random from the category's set. Repeats
    /// across consecutive draws are allowed.
    pub fn select(&self, category: Category) -> String {
        self.sets[&category]
            .choose(&mut rand::thread_rng())
            .expect("sound sets are non-empty after construction")
            .clone()
    }

    /// Resolves a clip name to its full path in the sound directory.
    pub fn resolve(&self, file: &str) -> PathBuf {
        self.sound_dir.join(file)
    }

    /// Returns the configured clips for the given category.
    pub fn files(&self, category: Category) -> &[String] {
        &self.sets[&category]
    }

    /// Returns the sound directory.
    pub fn sound_dir(&self) -> &Path {
        &self.sound_dir
    }

    /// Returns the resolved paths of all configured clips that are not
    /// present on disk. Advisory only: playback failures stay unobserved, so
    /// this is the operator's chance to catch typos before a show.
    pub fn missing(&self) -> Vec<PathBuf> {
        let mut missing = Vec::new();
        for category in Category::ALL {
            for file in self.files(category) {
                let path = self.resolve(file);
                if !path.is_file() {
                    missing.push(path);
                }
            }
        }
        missing
    }
}

#[cfg(test)]
mod test {
    use std::collections::{HashMap, HashSet};
    use std::error::Error;
    use std::fs::File;
    use std::path::PathBuf;

    use super::{Category, Library};

    fn test_sets() -> HashMap<Category, Vec<String>> {
        HashMap::from([
            (
                Category::Hit,
                vec![
                    "ricochet1.wav".to_string(),
                    "ricochet2.wav".to_string(),
                    "ricochet3.wav".to_string(),
                ],
            ),
            (Category::Win, vec!["win1.wav".to_string()]),
            (
                Category::Lose,
                vec!["lose1.wav".to_string(), "lose2.wav".to_string()],
            ),
        ])
    }

    #[test]
    fn test_select_membership() -> Result<(), Box<dyn Error>> {
        let library = Library::new(PathBuf::from("/sounds"), test_sets())?;

        for category in Category::ALL {
            let files = library.files(category).to_vec();
            for _ in 0..100 {
                assert!(files.contains(&library.select(category)));
            }
        }
        Ok(())
    }

    #[test]
    fn test_select_exercises_randomness() -> Result<(), Box<dyn Error>> {
        let library = Library::new(PathBuf::from("/sounds"), test_sets())?;

        // Three choices over a thousand draws. The odds of a constant outcome
        // are vanishingly small.
        let mut seen: HashSet<String> = HashSet::new();
        for _ in 0..1000 {
            seen.insert(library.select(Category::Hit));
        }
        assert!(seen.len() >= 2, "selection never varied");
        Ok(())
    }

    #[test]
    fn test_empty_set_rejected() {
        let mut sets = test_sets();
        sets.insert(Category::Win, vec![]);
        assert!(Library::new(PathBuf::from("/sounds"), sets).is_err());

        let mut sets = test_sets();
        sets.remove(&Category::Lose);
        assert!(Library::new(PathBuf::from("/sounds"), sets).is_err());
    }

    #[test]
    fn test_resolve() -> Result<(), Box<dyn Error>> {
        let library = Library::new(PathBuf::from("/home/pi/shooting-gallery"), test_sets())?;
        assert_eq!(
            PathBuf::from("/home/pi/shooting-gallery/ricochet1.wav"),
            library.resolve("ricochet1.wav")
        );
        Ok(())
    }

    #[test]
    fn test_missing() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        for file in ["ricochet1.wav", "ricochet2.wav", "win1.wav", "lose1.wav"] {
            File::create(dir.path().join(file))?;
        }

        let library = Library::new(dir.path().to_path_buf(), test_sets())?;
        let missing = library.missing();
        assert_eq!(
            vec![
                dir.path().join("ricochet3.wav"),
                dir.path().join("lose2.wav")
            ],
            missing
        );
        Ok(())
    }
}
