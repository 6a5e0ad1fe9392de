// Configuration module for reading Agent.toml
// All tunable weights, thresholds and caps of the move-selection engine live here

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub reachability: ReachabilityConfig,
    pub pathfinding: PathfindingConfig,
    pub targeting: TargetingConfig,
    pub safety: SafetyConfig,
    pub fallback: FallbackConfig,
    pub tie_break: TieBreakConfig,
    pub debug: DebugConfig,
}

/// Time budget handling
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    /// Budget assumed by the host adapter when the request carries none
    pub default_budget_ms: u64,
    /// Below this remaining budget the path searches are skipped
    pub min_search_budget_ms: u64,
}

/// Flood fill caps
#[derive(Debug, Deserialize, Clone)]
pub struct ReachabilityConfig {
    pub cap_length_multiplier: usize,
    pub min_cap: usize,
}

/// Edge cost model of the risk-weighted A*
#[derive(Debug, Deserialize, Clone)]
pub struct PathfindingConfig {
    pub snake_proximity_penalty: f64,
    pub wall_proximity_penalty: f64,
    /// 0 means only the boundary rows/columns count as "near wall"
    pub wall_margin: i32,
    pub corridor_length_threshold: usize,
    pub corridor_probe_cap: usize,
    pub corridor_penalty: f64,
}

/// Food target selection
#[derive(Debug, Deserialize, Clone)]
pub struct TargetingConfig {
    /// Snakes shorter than this go straight for the nearest food
    pub scoring_length_threshold: usize,
    pub food_space_cap: usize,
    pub space_weight_base: f64,
    pub space_weight_per_length: f64,
    pub distance_weight_base: f64,
    pub distance_weight_decay: f64,
    pub distance_weight_min: f64,
}

impl TargetingConfig {
    /// Weight of reachable space around a food cell, grows with length
    pub fn space_weight(&self, snake_len: usize) -> f64 {
        self.space_weight_base + self.space_weight_per_length * snake_len as f64
    }

    /// Weight of distance to a food cell, shrinks with length
    pub fn distance_weight(&self, snake_len: usize) -> f64 {
        (self.distance_weight_base - self.distance_weight_decay * snake_len as f64)
            .max(self.distance_weight_min)
    }
}

/// Acceptance checks for the food path and tail chase
#[derive(Debug, Deserialize, Clone)]
pub struct SafetyConfig {
    pub food_space_multiplier: f64,
    pub food_space_extra: usize,
    pub tail_chase_space_check: bool,
}

impl SafetyConfig {
    /// Reachable cells required after following a food path
    pub fn required_food_space(&self, snake_len: usize) -> usize {
        (snake_len as f64 * self.food_space_multiplier).ceil() as usize + self.food_space_extra
    }
}

/// Safest-direction scoring
#[derive(Debug, Deserialize, Clone)]
pub struct FallbackConfig {
    pub space_weight: f64,
    pub min_space_fraction: f64,
    pub tail_closer_bonus: f64,
    pub wall_penalty: f64,
    pub wall_margin: i32,
    pub body_adjacent_penalty: f64,
    pub center_bias_min_length: usize,
    pub center_weight: f64,
}

impl FallbackConfig {
    pub fn min_space(&self, snake_len: usize) -> usize {
        (snake_len as f64 * self.min_space_fraction).ceil() as usize
    }
}

/// Tie-breaking between equally scored directions
#[derive(Debug, Deserialize, Clone)]
pub struct TieBreakConfig {
    pub randomize: bool,
    pub seed: u64,
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
    /// * `path` - Path to the Agent.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Agent.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Agent.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Agent.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                default_budget_ms: 100,
                min_search_budget_ms: 2,
            },
            reachability: ReachabilityConfig {
                cap_length_multiplier: 2,
                min_cap: 8,
            },
            pathfinding: PathfindingConfig {
                snake_proximity_penalty: 0.5,
                wall_proximity_penalty: 0.3,
                wall_margin: 0,
                corridor_length_threshold: 20,
                corridor_probe_cap: 12,
                corridor_penalty: 0.2,
            },
            targeting: TargetingConfig {
                scoring_length_threshold: 10,
                food_space_cap: 40,
                space_weight_base: 0.5,
                space_weight_per_length: 0.05,
                distance_weight_base: 2.0,
                distance_weight_decay: 0.03,
                distance_weight_min: 0.5,
            },
            safety: SafetyConfig {
                food_space_multiplier: 1.0,
                food_space_extra: 0,
                tail_chase_space_check: false,
            },
            fallback: FallbackConfig {
                space_weight: 10.0,
                min_space_fraction: 0.55,
                tail_closer_bonus: 3.0,
                wall_penalty: 2.0,
                wall_margin: 0,
                body_adjacent_penalty: 1.0,
                center_bias_min_length: 15,
                center_weight: 0.5,
            },
            tie_break: TieBreakConfig {
                randomize: false,
                seed: 42,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "snake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            eprintln!("Warning: Could not load Agent.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.pathfinding.snake_proximity_penalty, 0.5);
        assert_eq!(config.fallback.min_space_fraction, 0.55);
    }

    #[test]
    fn test_agent_toml_can_be_parsed() {
        let result = Config::from_file("Agent.toml");
        assert!(result.is_ok(), "Failed to parse Agent.toml: {:?}", result.err());
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file = Config::from_file("Agent.toml").expect("Agent.toml should be parseable");
        let hard = Config::default_hardcoded();

        assert_eq!(file.timing.default_budget_ms, hard.timing.default_budget_ms);
        assert_eq!(file.timing.min_search_budget_ms, hard.timing.min_search_budget_ms);

        assert_eq!(
            file.reachability.cap_length_multiplier,
            hard.reachability.cap_length_multiplier
        );
        assert_eq!(file.reachability.min_cap, hard.reachability.min_cap);

        assert_eq!(
            file.pathfinding.snake_proximity_penalty,
            hard.pathfinding.snake_proximity_penalty
        );
        assert_eq!(
            file.pathfinding.wall_proximity_penalty,
            hard.pathfinding.wall_proximity_penalty
        );
        assert_eq!(file.pathfinding.wall_margin, hard.pathfinding.wall_margin);
        assert_eq!(
            file.pathfinding.corridor_length_threshold,
            hard.pathfinding.corridor_length_threshold
        );
        assert_eq!(file.pathfinding.corridor_probe_cap, hard.pathfinding.corridor_probe_cap);
        assert_eq!(file.pathfinding.corridor_penalty, hard.pathfinding.corridor_penalty);

        assert_eq!(
            file.targeting.scoring_length_threshold,
            hard.targeting.scoring_length_threshold
        );
        assert_eq!(file.targeting.food_space_cap, hard.targeting.food_space_cap);
        assert_eq!(file.targeting.space_weight(12), hard.targeting.space_weight(12));
        assert_eq!(file.targeting.distance_weight(12), hard.targeting.distance_weight(12));

        assert_eq!(file.safety.food_space_multiplier, hard.safety.food_space_multiplier);
        assert_eq!(file.safety.food_space_extra, hard.safety.food_space_extra);
        assert_eq!(file.safety.tail_chase_space_check, hard.safety.tail_chase_space_check);

        assert_eq!(file.fallback.space_weight, hard.fallback.space_weight);
        assert_eq!(file.fallback.min_space_fraction, hard.fallback.min_space_fraction);
        assert_eq!(file.fallback.tail_closer_bonus, hard.fallback.tail_closer_bonus);
        assert_eq!(file.fallback.wall_penalty, hard.fallback.wall_penalty);
        assert_eq!(file.fallback.body_adjacent_penalty, hard.fallback.body_adjacent_penalty);
        assert_eq!(file.fallback.center_bias_min_length, hard.fallback.center_bias_min_length);
        assert_eq!(file.fallback.center_weight, hard.fallback.center_weight);

        assert_eq!(file.tie_break.randomize, hard.tie_break.randomize);
        assert_eq!(file.tie_break.seed, hard.tie_break.seed);
        assert!(!file.debug.log_file_path.is_empty());
    }

    #[test]
    fn test_length_scaled_weights_are_monotonic() {
        let t = Config::default_hardcoded().targeting;
        assert!(t.space_weight(30) > t.space_weight(10));
        assert!(t.distance_weight(30) <= t.distance_weight(10));
        assert_eq!(t.distance_weight(10_000), t.distance_weight_min);
    }

    #[test]
    fn test_space_thresholds() {
        let config = Config::default_hardcoded();
        assert_eq!(config.safety.required_food_space(5), 5);
        assert_eq!(config.fallback.min_space(10), 6);
        assert_eq!(config.fallback.min_space(1), 1);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
