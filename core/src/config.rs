use crate::{
    actor::Species,
    cave_generator::{DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_CAVE_FRACTION},
    error::{SimError, SimResult},
    hex::Pos,
    level::Shape,
    types::{Tick, TURN},
};
use serde::{Deserialize, Serialize};

/// How discovered tiles are reported after each command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileReporting {
    /// Only tiles not yet sent on the current floor.
    Diff,
    /// The whole visible set, every time.
    Full,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    /// Player start. Defaults to the centre of the playfield.
    pub start: Option<Pos>,
    pub player_delay: Tick,
    pub mobs_per_level: usize,
    pub species: Vec<Species>,
    pub tile_reporting: TileReporting,
    /// Regenerate when the main cave covers less than this share of the map.
    pub min_cave_fraction: f64,
    pub max_generation_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 21,
            height: 21,
            start: None,
            player_delay: TURN,
            mobs_per_level: 3,
            species: vec![
                Species { name: "rat".into(), delay: 8 },
                Species { name: "bat".into(), delay: 6 },
                Species { name: "slime".into(), delay: 24 },
            ],
            tile_reporting: TileReporting::Diff,
            min_cave_fraction: DEFAULT_MIN_CAVE_FRACTION,
            max_generation_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl GameConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Self::from_json(&content).map_err(|e| anyhow::anyhow!("Cannot load {path}: {e}"))
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> SimResult<Self> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in tests: the standard
    /// playfield with no wanderers, so only the player moves.
    pub fn default_test() -> Self {
        Self {
            mobs_per_level: 0,
            ..Self::default()
        }
    }

    pub fn shape(&self) -> SimResult<Shape> {
        Shape::new(self.width, self.height)
    }

    pub fn start_pos(&self) -> SimResult<Pos> {
        let shape = self.shape()?;
        Ok(self.start.unwrap_or_else(|| shape.center()))
    }

    /// Reject anything that would produce a degenerate level or an
    /// undefined turn cost.
    pub fn validate(&self) -> SimResult<()> {
        let shape = self.shape()?;
        let start = self.start_pos()?;
        if !shape.contains_inner(start) {
            return Err(SimError::StartOutsideInterior { x: start.x, y: start.y });
        }
        if self.player_delay == 0 {
            return Err(SimError::Config {
                reason: "player_delay must be positive".into(),
            });
        }
        if let Some(s) = self.species.iter().find(|s| s.delay == 0) {
            return Err(SimError::Config {
                reason: format!("species '{}' has zero delay", s.name),
            });
        }
        if self.mobs_per_level > 0 && self.species.is_empty() {
            return Err(SimError::Config {
                reason: "mobs_per_level is set but no species are defined".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.min_cave_fraction) {
            return Err(SimError::Config {
                reason: format!("min_cave_fraction {} outside [0, 1]", self.min_cave_fraction),
            });
        }
        if self.max_generation_attempts == 0 {
            return Err(SimError::Config {
                reason: "max_generation_attempts must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_config_matches_defaults() {
        let config = GameConfig::from_json(include_str!("../../data/game_config.json"))
            .expect("shipped config parses");
        let defaults = GameConfig::default();
        assert_eq!(config.width, defaults.width);
        assert_eq!(config.species, defaults.species);
        assert_eq!(config.tile_reporting, TileReporting::Diff);
        assert_eq!(config.start_pos().expect("start"), Pos::new(10, 10));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = GameConfig::from_json(r#"{ "tile_reporting": "full" }"#).expect("parses");
        assert_eq!(config.tile_reporting, TileReporting::Full);
        assert_eq!(config.player_delay, TURN);
    }

    #[test]
    fn bad_json_is_a_serialization_error() {
        let err = GameConfig::from_json("{ width: ").unwrap_err();
        assert!(matches!(err, SimError::Serialization(_)));
    }

    #[test]
    fn parsed_config_is_validated() {
        let err = GameConfig::from_json(r#"{ "width": 3 }"#).unwrap_err();
        assert!(matches!(err, SimError::GenerationDegenerate { .. }));
        let err = GameConfig::from_json(r#"{ "player_delay": 0 }"#).unwrap_err();
        assert!(matches!(err, SimError::Config { .. }));
    }
}
