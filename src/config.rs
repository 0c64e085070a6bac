// Configuration module for reading Snake.toml
// This module provides OOP-style configuration management for the Battlesnake bot

use log::warn;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::types::Orientation;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub heuristics: HeuristicsConfig,
    pub scores: ScoresConfig,
    pub board: BoardConfig,
    pub debug: DebugConfig,
}

/// Thresholds that decide when the scoring terms switch on
#[derive(Debug, Deserialize, Clone)]
pub struct HeuristicsConfig {
    /// Flood fill depth is ceil(turn / depth_divisor)
    pub depth_divisor: u32,
    pub max_depth: u32,
    /// Below this health food becomes urgent
    pub health_threshold: i32,
    /// Below this length we keep growing; at or above it we only eat when hungry
    pub size_to_diet: usize,
    /// Flood fill layers in which cells a bigger enemy can reach are avoided
    pub time_to_avoid_heads: u32,
    /// First turn on which chasing tails is rewarded
    pub time_to_chase_tails: i32,
    pub early_game_turns: i32,
}

impl HeuristicsConfig {
    /// Number of flood fill layers explored on the given turn
    pub fn search_depth(&self, turn: i32) -> u32 {
        let turn = turn.max(0) as u32;
        let divisor = self.depth_divisor.max(1);
        turn.div_ceil(divisor).min(self.max_depth)
    }
}

/// Score weights for the local and global heuristics
#[derive(Debug, Deserialize, Clone)]
pub struct ScoresConfig {
    // Local heuristic
    pub local_base_score: i32,
    pub occupied_penalty: i32,
    pub losing_battle_penalty: i32,
    pub winning_battle_bonus: i32,
    pub adjacent_food_bonus: i32,
    pub urgent_food_multiplier: i32,

    // Global heuristic
    pub area_reward: i32,
    pub food_weight: i32,
    pub contested_penalty: i32,
    pub tail_chase_bonus: i32,
    pub tail_chase_min_length: usize,
}

/// Board geometry
#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    #[serde(default)]
    pub orientation: Orientation,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            heuristics: HeuristicsConfig {
                depth_divisor: 10,
                max_depth: 12,
                health_threshold: 30,
                size_to_diet: 10,
                time_to_avoid_heads: 2,
                time_to_chase_tails: 5,
                early_game_turns: 20,
            },
            scores: ScoresConfig {
                local_base_score: 12,
                occupied_penalty: 3,
                losing_battle_penalty: 4,
                winning_battle_bonus: 1,
                adjacent_food_bonus: 2,
                urgent_food_multiplier: 3,
                area_reward: 1,
                food_weight: 2,
                contested_penalty: 6,
                tail_chase_bonus: 1,
                tail_chase_min_length: 4,
            },
            board: BoardConfig {
                orientation: Orientation::YUp,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "battlesnake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error.
    /// Environment overrides are applied on top either way.
    pub fn load_or_default() -> Self {
        let mut config = Self::load_default().unwrap_or_else(|e| {
            warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        });
        config.apply_overrides(|key| env::var(key).ok());
        config
    }

    /// Overrides heuristic thresholds from `SNAKE_*` variables found through `lookup`.
    /// Values that fail to parse are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let h = &mut self.heuristics;
        override_from(&lookup, "SNAKE_DEPTH_DIVISOR", &mut h.depth_divisor);
        override_from(&lookup, "SNAKE_HEALTH_THRESHOLD", &mut h.health_threshold);
        override_from(&lookup, "SNAKE_SIZE_TO_DIET", &mut h.size_to_diet);
        override_from(&lookup, "SNAKE_TIME_TO_AVOID_HEADS", &mut h.time_to_avoid_heads);
        override_from(&lookup, "SNAKE_TIME_TO_CHASE_TAILS", &mut h.time_to_chase_tails);
    }
}

fn override_from<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => warn!("Ignoring {}={:?}: not a valid integer", key, raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.heuristics.depth_divisor, 10);
        assert_eq!(config.board.orientation, Orientation::YUp);
    }

    #[test]
    fn test_search_depth_is_ceiling_of_turn_over_divisor() {
        let h = Config::default_hardcoded().heuristics;
        assert_eq!(h.search_depth(0), 0);
        assert_eq!(h.search_depth(1), 1);
        assert_eq!(h.search_depth(10), 1);
        assert_eq!(h.search_depth(11), 2);
        assert_eq!(h.search_depth(-5), 0);
        assert_eq!(h.search_depth(10_000), h.max_depth);
    }

    #[test]
    fn test_zero_divisor_does_not_panic() {
        let mut h = Config::default_hardcoded().heuristics;
        h.depth_divisor = 0;
        assert_eq!(h.search_depth(3), 3);
    }

    #[test]
    fn test_huge_divisor_does_not_overflow() {
        let mut h = Config::default_hardcoded().heuristics;
        h.depth_divisor = u32::MAX;
        assert_eq!(h.search_depth(2), 1);
        assert_eq!(h.search_depth(i32::MAX), 1);
    }

    #[test]
    fn test_snake_toml_can_be_parsed() {
        // This test ensures Snake.toml is valid and can be parsed
        let result = Config::from_file("Snake.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Snake.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Snake.toml").expect("Snake.toml should be parseable");
        let hardcoded = Config::default_hardcoded();

        let (f, h) = (&file_config.heuristics, &hardcoded.heuristics);
        assert_eq!(f.depth_divisor, h.depth_divisor);
        assert_eq!(f.max_depth, h.max_depth);
        assert_eq!(f.health_threshold, h.health_threshold);
        assert_eq!(f.size_to_diet, h.size_to_diet);
        assert_eq!(f.time_to_avoid_heads, h.time_to_avoid_heads);
        assert_eq!(f.time_to_chase_tails, h.time_to_chase_tails);
        assert_eq!(f.early_game_turns, h.early_game_turns);

        let (f, h) = (&file_config.scores, &hardcoded.scores);
        assert_eq!(f.local_base_score, h.local_base_score);
        assert_eq!(f.occupied_penalty, h.occupied_penalty);
        assert_eq!(f.losing_battle_penalty, h.losing_battle_penalty);
        assert_eq!(f.winning_battle_bonus, h.winning_battle_bonus);
        assert_eq!(f.adjacent_food_bonus, h.adjacent_food_bonus);
        assert_eq!(f.urgent_food_multiplier, h.urgent_food_multiplier);
        assert_eq!(f.area_reward, h.area_reward);
        assert_eq!(f.food_weight, h.food_weight);
        assert_eq!(f.contested_penalty, h.contested_penalty);
        assert_eq!(f.tail_chase_bonus, h.tail_chase_bonus);
        assert_eq!(f.tail_chase_min_length, h.tail_chase_min_length);

        assert_eq!(file_config.board.orientation, hardcoded.board.orientation);
        assert_eq!(file_config.debug.enabled, hardcoded.debug.enabled);
        assert_eq!(file_config.debug.log_file_path, hardcoded.debug.log_file_path);
    }

    #[test]
    fn test_overrides_replace_thresholds() {
        let vars: HashMap<&str, &str> = [
            ("SNAKE_DEPTH_DIVISOR", "4"),
            ("SNAKE_HEALTH_THRESHOLD", " 50 "),
            ("SNAKE_SIZE_TO_DIET", "7"),
            ("SNAKE_TIME_TO_AVOID_HEADS", "3"),
            ("SNAKE_TIME_TO_CHASE_TAILS", "0"),
        ]
        .iter()
        .cloned()
        .collect();

        let mut config = Config::default_hardcoded();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.heuristics.depth_divisor, 4);
        assert_eq!(config.heuristics.health_threshold, 50);
        assert_eq!(config.heuristics.size_to_diet, 7);
        assert_eq!(config.heuristics.time_to_avoid_heads, 3);
        assert_eq!(config.heuristics.time_to_chase_tails, 0);
    }

    #[test]
    fn test_invalid_override_keeps_default() {
        let mut config = Config::default_hardcoded();
        config.apply_overrides(|key| {
            if key == "SNAKE_DEPTH_DIVISOR" {
                Some("ten".to_string())
            } else {
                None
            }
        });
        assert_eq!(config.heuristics.depth_divisor, 10);
    }

    #[test]
    fn test_orientation_parses_from_toml() {
        let board: BoardConfig = toml::from_str("orientation = \"down\"").unwrap();
        assert_eq!(board.orientation, Orientation::YDown);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        // Test with a non-existent file
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
