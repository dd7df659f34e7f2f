/// Character registry — named direction profiles and the selectors that
/// resolve to them.

use log::{debug, error};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::profile::{DirectionProfile, ProfileError};
use crate::schema::direction::Direction::{self, East, North, South, West};
use crate::schema::marker::{Color, Marker, Shape};

/// Selector that expands to every registered character, in order.
pub const ALL_SELECTOR: &str = "All";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown character '{name}'")]
    UnknownCharacter { name: String, guidance: String },
    #[error("'{0}' is reserved and cannot name a character")]
    ReservedName(String),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A named walker with its move profile and plot marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub profile: DirectionProfile,
    #[serde(default)]
    pub marker: Marker,
}

/// Built-in characters, in "All" order.
const BUILTIN: &[(&str, &[Direction], Marker)] = &[
    ("Pa", &[North, East, South, West], Marker::new(Shape::Circle, Color::Black)),
    ("Mi-Ma", &[North, East, South, South, West], Marker::new(Shape::Square, Color::Green)),
    ("Reg", &[East, West], Marker::new(Shape::Triangle, Color::Red)),
];

/// Ordered set of characters with case-insensitive lookup.
#[derive(Debug, Clone, Default)]
pub struct CharacterRegistry {
    characters: Vec<Character>,
    index: FxHashMap<String, usize>,
}

impl CharacterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding Pa, Mi-Ma and Reg.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (name, entries, marker) in BUILTIN {
            let registered = DirectionProfile::new(entries.to_vec())
                .map_err(RegistryError::from)
                .and_then(|profile| {
                    registry.register(Character {
                        name: name.to_string(),
                        profile,
                        marker: *marker,
                    })
                });
            if let Err(e) = registered {
                error!("built-in character {} skipped: {}", name, e);
            }
        }
        registry
    }

    /// Add a character. A character with the same (case-insensitive) name is
    /// replaced in place, keeping its position in the order.
    pub fn register(&mut self, character: Character) -> Result<(), RegistryError> {
        let key = character.name.to_lowercase();
        if key == ALL_SELECTOR.to_lowercase() {
            return Err(RegistryError::ReservedName(character.name));
        }
        match self.index.get(&key) {
            Some(&slot) => {
                debug!("character {} overrides {}", character.name, self.characters[slot].name);
                self.characters[slot] = character;
            }
            None => {
                self.index.insert(key, self.characters.len());
                self.characters.push(character);
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Character> {
        self.index
            .get(&name.to_lowercase())
            .map(|&slot| &self.characters[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.characters.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Resolve a selector to the characters it runs, in run order.
    pub fn resolve(&self, selector: &str) -> Result<Vec<&Character>, RegistryError> {
        if selector.eq_ignore_ascii_case(ALL_SELECTOR) {
            return Ok(self.characters.iter().collect());
        }
        self.get(selector)
            .map(|c| vec![c])
            .ok_or_else(|| RegistryError::UnknownCharacter {
                name: selector.to_string(),
                guidance: self.guidance(selector),
            })
    }

    /// User-facing message for an unrecognized selector.
    pub fn guidance(&self, selector: &str) -> String {
        let mut options: Vec<String> = self.names().iter().map(|n| format!("\"{}\"", n)).collect();
        options.push(format!("\"{}\"", ALL_SELECTOR));
        let listed = match options.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
            Some((last, _)) => last.clone(),
            None => String::new(),
        };
        format!(
            "\"{}\" is not a character. Please use {} (not case-sensitive).",
            selector, listed
        )
    }

    /// Parse a list of characters from a RON string.
    pub fn parse_ron(input: &str) -> Result<CharacterRegistry, RegistryError> {
        let raw: Vec<Character> = ron::from_str(input)?;
        let mut registry = Self::new();
        for character in raw {
            registry.register(character)?;
        }
        Ok(registry)
    }

    /// Load characters from a RON file and merge them into this registry.
    pub fn load_from_ron(&mut self, path: &Path) -> Result<(), RegistryError> {
        let contents = std::fs::read_to_string(path)?;
        let loaded = Self::parse_ron(&contents)?;
        debug!("loaded {} characters from {}", loaded.len(), path.display());
        self.merge(loaded)
    }

    /// Merge another registry into this one. Same-name characters from
    /// `other` override; new names are appended in `other`'s order.
    pub fn merge(&mut self, other: CharacterRegistry) -> Result<(), RegistryError> {
        for character in other.characters {
            self.register(character)?;
        }
        Ok(())
    }
}
