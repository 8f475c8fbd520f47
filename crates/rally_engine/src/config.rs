//! Match configuration and model tuning.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Immutable input describing one simulated match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Name of player A.
    pub player_a: String,
    /// Name of player B.
    pub player_b: String,
    /// Best-of length, 3 or 5.
    pub max_sets: u32,
    /// Percent chance that B wins a generic point before adjustments.
    pub starting_bias: i64,
    /// Seed for the match RNG. `None` draws from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Momentum shift per point won.
    #[serde(default = "default_point_delta")]
    pub point_delta: i32,
    /// Momentum shift per game won.
    #[serde(default = "default_game_delta")]
    pub game_delta: i32,
    /// Momentum shift per set won.
    #[serde(default = "default_set_delta")]
    pub set_delta: i32,
}

const fn default_point_delta() -> i32 {
    1
}

const fn default_game_delta() -> i32 {
    2
}

const fn default_set_delta() -> i32 {
    5
}

impl MatchConfig {
    /// Creates a configuration with default momentum deltas and no seed.
    #[must_use]
    pub fn new(
        player_a: impl Into<String>,
        player_b: impl Into<String>,
        max_sets: u32,
        starting_bias: i64,
    ) -> Self {
        Self {
            player_a: player_a.into(),
            player_b: player_b.into(),
            max_sets,
            starting_bias,
            seed: None,
            point_delta: default_point_delta(),
            game_delta: default_game_delta(),
            set_delta: default_set_delta(),
        }
    }

    /// Sets the RNG seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets all three momentum deltas.
    #[must_use]
    pub const fn with_deltas(mut self, point_delta: i32, game_delta: i32, set_delta: i32) -> Self {
        self.point_delta = point_delta;
        self.game_delta = game_delta;
        self.set_delta = set_delta;
        self
    }

    /// Number of sets a player needs to take the match.
    #[must_use]
    pub const fn sets_to_win(&self) -> u32 {
        self.max_sets / 2 + 1
    }

    /// Checks the configuration against the rules callers must enforce.
    ///
    /// # Errors
    ///
    /// Returns the first rule violated: a bad name, set count or bias.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.player_a)?;
        validate_name(&self.player_b)?;
        validate_sets(self.max_sets)?;
        validate_bias(self.starting_bias)?;
        Ok(())
    }
}

/// Validates a player name and returns it trimmed.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] if the trimmed name is empty or has
/// anything other than ASCII letters and spaces.
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    let valid = !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == ' ');
    if valid {
        Ok(trimmed.to_string())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}

/// Validates a best-of length.
///
/// # Errors
///
/// Returns [`Error::InvalidSets`] unless `max_sets` is 3 or 5.
pub const fn validate_sets(max_sets: u32) -> Result<u32> {
    match max_sets {
        3 | 5 => Ok(max_sets),
        other => Err(Error::InvalidSets(other)),
    }
}

/// Validates a starting bias percentage.
///
/// # Errors
///
/// Returns [`Error::InvalidBias`] if `bias` is outside `0..=100`.
pub fn validate_bias(bias: i64) -> Result<i64> {
    if (0..=100).contains(&bias) {
        Ok(bias)
    } else {
        Err(Error::InvalidBias(bias))
    }
}

/// Fixed constants of the point model.
///
/// Defaults reproduce the reference behaviour; tests may override them to
/// force particular serve or momentum outcomes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineTuning {
    /// Probability that a first serve lands in.
    pub first_serve_in: f64,
    /// Probability that a second serve lands in.
    pub second_serve_in: f64,
    /// Share of faults that hit the net rather than going out.
    pub net_fault_share: f64,
    /// Damping applied to accumulated momentum before it moves the bias.
    pub momentum_damping: f64,
    /// Bias points granted to the server on every point.
    pub server_advantage: i64,
    /// Lowest bias either player can be pushed to.
    pub bias_floor: i64,
    /// Highest bias either player can be pushed to.
    pub bias_ceiling: i64,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            first_serve_in: 0.65,
            second_serve_in: 0.9,
            net_fault_share: 0.5,
            momentum_damping: 0.8,
            server_advantage: 3,
            bias_floor: 10,
            bias_ceiling: 90,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_to_win_is_strict_majority() {
        assert_eq!(MatchConfig::new("A", "B", 3, 50).sets_to_win(), 2);
        assert_eq!(MatchConfig::new("A", "B", 5, 50).sets_to_win(), 3);
    }

    #[test]
    fn validate_accepts_letters_and_spaces() {
        assert_eq!(validate_name("  Ann Lee ").unwrap(), "Ann Lee");
        assert!(MatchConfig::new("Ann", "Bo", 5, 0).validate().is_ok());
        assert!(MatchConfig::new("Ann", "Bo", 3, 100).validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_input() {
        assert_eq!(
            MatchConfig::new("Ann3", "Bo", 3, 50).validate(),
            Err(Error::InvalidName("Ann3".to_string()))
        );
        assert!(matches!(validate_name("   "), Err(Error::InvalidName(_))));
        assert_eq!(
            MatchConfig::new("Ann", "Bo", 4, 50).validate(),
            Err(Error::InvalidSets(4))
        );
        assert_eq!(
            MatchConfig::new("Ann", "Bo", 3, 101).validate(),
            Err(Error::InvalidBias(101))
        );
        assert_eq!(validate_bias(-1), Err(Error::InvalidBias(-1)));
    }

    #[test]
    fn deserialize_fills_momentum_defaults() {
        let yaml = "player_a: Ann\nplayer_b: Bo\nmax_sets: 5\nstarting_bias: 60\nseed: 7\n";
        let config: MatchConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(
            (config.point_delta, config.game_delta, config.set_delta),
            (1, 2, 5)
        );
    }

    #[test]
    fn default_tuning_matches_model_constants() {
        let tuning = EngineTuning::default();
        assert!((tuning.first_serve_in - 0.65).abs() < f64::EPSILON);
        assert!((tuning.second_serve_in - 0.9).abs() < f64::EPSILON);
        assert!((tuning.momentum_damping - 0.8).abs() < f64::EPSILON);
        assert_eq!(tuning.server_advantage, 3);
        assert_eq!((tuning.bias_floor, tuning.bias_ceiling), (10, 90));
    }
}
