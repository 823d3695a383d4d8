//! Level data: immutable templates and the per-run active copy
//!
//! Templates are parsed once from `assets/levels.json`. Loading a level copies
//! what a run may change (collectible flags) so the template is never mutated.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::COLLECTIBLE_BOX_SIZE;

/// Built-in level table
const BUILTIN_LEVELS: &str = include_str!("../../assets/levels.json");

/// Error type for level lookup and parsing
#[derive(Debug)]
pub enum LevelError {
    /// No level with this id
    NotFound(u32),
    /// Level data is not valid JSON for the expected layout
    Parse(serde_json::Error),
    /// Level data parsed but breaks an invariant (empty, id gaps, duplicates)
    Invalid(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::NotFound(id) => write!(f, "level {} not found", id),
            LevelError::Parse(e) => write!(f, "level data parse error: {}", e),
            LevelError::Invalid(msg) => write!(f, "invalid level data: {}", msg),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Parse(e)
    }
}

/// A level template as authored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: u32,
    /// World width; bounds the camera and the player
    pub width: f32,
    /// Player spawn (top-left corner)
    pub start: Vec2,
    pub platforms: Vec<Rect>,
    /// Crown centers
    pub collectibles: Vec<Vec2>,
    pub goal: Rect,
}

#[derive(Debug, Deserialize)]
struct LevelFile {
    levels: Vec<Level>,
}

/// All levels, keyed by consecutive ids starting at 1
#[derive(Debug, Clone)]
pub struct LevelSet {
    levels: BTreeMap<u32, Level>,
}

impl LevelSet {
    /// The levels shipped with the game
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_json(BUILTIN_LEVELS)
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let file: LevelFile = serde_json::from_str(json)?;
        Self::from_levels(file.levels)
    }

    pub fn from_levels(levels: Vec<Level>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::Invalid("no levels defined".into()));
        }
        let mut map = BTreeMap::new();
        for level in levels {
            let id = level.id;
            if map.insert(id, level).is_some() {
                return Err(LevelError::Invalid(format!("duplicate level id {}", id)));
            }
        }
        for (expected, id) in (1u32..).zip(map.keys()) {
            if *id != expected {
                return Err(LevelError::Invalid(format!(
                    "level ids must be consecutive from 1, found {} where {} was expected",
                    id, expected
                )));
            }
        }
        log::info!("Loaded {} levels", map.len());
        Ok(Self { levels: map })
    }

    pub fn get(&self, id: u32) -> Result<&Level, LevelError> {
        self.levels.get(&id).ok_or(LevelError::NotFound(id))
    }

    pub fn contains(&self, id: u32) -> bool {
        self.levels.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// A crown in the active level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collectible {
    pub pos: Vec2,
    pub collected: bool,
}

impl Collectible {
    /// Pickup box centered on the crown
    pub fn hitbox(&self) -> Rect {
        Rect::centered(self.pos, COLLECTIBLE_BOX_SIZE, COLLECTIBLE_BOX_SIZE)
    }
}

/// The level currently being played
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveLevel {
    pub id: u32,
    pub width: f32,
    pub start: Vec2,
    pub platforms: Vec<Rect>,
    pub collectibles: Vec<Collectible>,
    pub goal: Rect,
}

impl ActiveLevel {
    pub fn from_template(level: &Level) -> Self {
        Self {
            id: level.id,
            width: level.width,
            start: level.start,
            platforms: level.platforms.clone(),
            collectibles: level
                .collectibles
                .iter()
                .map(|&pos| Collectible {
                    pos,
                    collected: false,
                })
                .collect(),
            goal: level.goal,
        }
    }

    /// Bring back every crown for a fresh attempt
    pub fn respawn_collectibles(&mut self) {
        for collectible in &mut self.collectibles {
            collectible.collected = false;
        }
    }

    pub fn remaining(&self) -> usize {
        self.collectibles.iter().filter(|c| !c.collected).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_parse() {
        let levels = LevelSet::builtin().expect("builtin levels should parse");
        assert_eq!(levels.len(), 2);

        let first = levels.get(1).unwrap();
        assert_eq!(first.width, 3000.0);
        assert_eq!(first.start, Vec2::new(100.0, 100.0));
        assert_eq!(first.platforms.len(), 12);
        assert_eq!(first.collectibles.len(), 10);
        assert_eq!(first.goal, Rect::new(2800.0, 450.0, 60.0, 100.0));

        let second = levels.get(2).unwrap();
        assert_eq!(second.width, 3500.0);
        assert_eq!(second.collectibles.len(), 17);
    }

    #[test]
    fn test_missing_level() {
        let levels = LevelSet::builtin().unwrap();
        assert!(matches!(levels.get(3), Err(LevelError::NotFound(3))));
        assert!(!levels.contains(0));
    }

    #[test]
    fn test_rejects_gaps_and_empty() {
        let json = r#"{"levels": [
            {"id": 1, "width": 100, "start": [0, 0], "platforms": [], "collectibles": [],
             "goal": {"x": 0, "y": 0, "width": 1, "height": 1}},
            {"id": 3, "width": 100, "start": [0, 0], "platforms": [], "collectibles": [],
             "goal": {"x": 0, "y": 0, "width": 1, "height": 1}}
        ]}"#;
        assert!(matches!(LevelSet::from_json(json), Err(LevelError::Invalid(_))));
        assert!(matches!(
            LevelSet::from_json(r#"{"levels": []}"#),
            Err(LevelError::Invalid(_))
        ));
        assert!(matches!(LevelSet::from_json("not json"), Err(LevelError::Parse(_))));
    }

    #[test]
    fn test_active_copy_leaves_template_untouched() {
        let levels = LevelSet::builtin().unwrap();
        let template = levels.get(1).unwrap().clone();
        let mut active = ActiveLevel::from_template(levels.get(1).unwrap());

        active.collectibles[0].collected = true;
        assert_eq!(active.remaining(), template.collectibles.len() - 1);
        assert_eq!(levels.get(1).unwrap(), &template);

        active.respawn_collectibles();
        assert_eq!(active.remaining(), template.collectibles.len());
    }

    #[test]
    fn test_collectible_hitbox() {
        let c = Collectible {
            pos: Vec2::new(200.0, 500.0),
            collected: false,
        };
        assert_eq!(c.hitbox(), Rect::new(185.0, 485.0, 30.0, 30.0));
    }
}
