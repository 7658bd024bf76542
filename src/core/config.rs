//! Session configuration.

use super::constants::*;
use super::error::GameError;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

/// Tunables for one game session. Missing fields fall back to defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Square map side length (5-15 for interactive play)
    pub map_size: usize,

    /// Chance that stepping onto a Common tile starts a battle
    pub encounter_chance: f64,

    /// Rejection-sampling attempts before the map generator gives up
    pub map_max_attempts: u32,

    /// Repair the last sample instead of failing once attempts run out
    pub map_fallback_carve: bool,

    pub max_party_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            map_size: DEFAULT_MAP_SIZE,
            encounter_chance: ENCOUNTER_CHANCE,
            map_max_attempts: DEFAULT_MAP_MAX_ATTEMPTS,
            map_fallback_carve: true,
            max_party_size: MAX_PARTY_SIZE,
        }
    }
}

impl GameConfig {
    /// Default rules on a map of the given size.
    pub fn with_map_size(map_size: usize) -> Self {
        Self {
            map_size,
            ..Default::default()
        }
    }

    /// No random encounters; handy for exploring a map.
    pub fn peaceful(map_size: usize) -> Self {
        Self {
            map_size,
            encounter_chance: 0.0,
            ..Default::default()
        }
    }

    /// Strict generation: no repair, fail once attempts run out.
    pub fn strict_generation(map_size: usize, max_attempts: u32) -> Self {
        Self {
            map_size,
            map_max_attempts: max_attempts,
            map_fallback_carve: false,
            ..Default::default()
        }
    }

    pub fn from_path(path: &Path) -> io::Result<Self> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !(MIN_MAP_SIZE..=MAX_MAP_SIZE).contains(&self.map_size) {
            return Err(GameError::InvalidMapSize {
                rows: self.map_size,
                cols: self.map_size,
            });
        }
        Ok(())
    }

    /// Encounter chance clamped into [0, 1].
    pub fn encounter_probability(&self) -> f64 {
        self.encounter_chance.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.map_size, 8);
        assert_eq!(cfg.encounter_chance, 0.30);
        assert_eq!(cfg.map_max_attempts, 1000);
        assert!(cfg.map_fallback_carve);
        assert_eq!(cfg.max_party_size, 3);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_map_size_bounds() {
        assert!(GameConfig::with_map_size(5).validate().is_ok());
        assert!(GameConfig::with_map_size(15).validate().is_ok());
        assert_eq!(
            GameConfig::with_map_size(4).validate(),
            Err(GameError::InvalidMapSize { rows: 4, cols: 4 })
        );
        assert!(GameConfig::with_map_size(16).validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: GameConfig = serde_json::from_str(r#"{"map_size": 12}"#).unwrap();
        assert_eq!(cfg.map_size, 12);
        assert_eq!(cfg.encounter_chance, ENCOUNTER_CHANCE);
        assert!(cfg.map_fallback_carve);
    }

    #[test]
    fn test_encounter_probability_clamped() {
        let mut cfg = GameConfig::peaceful(6);
        assert_eq!(cfg.encounter_probability(), 0.0);
        cfg.encounter_chance = 3.0;
        assert_eq!(cfg.encounter_probability(), 1.0);
    }
}
