//! Property-based generators for match configurations.
//!
//! Uses proptest strategies to generate:
//! - Player names that pass validation
//! - Best-of lengths and starting biases
//! - Momentum deltas weighted toward the defaults
//! - Complete seeded configurations

use proptest::prelude::*;
use rally_engine::MatchConfig;

/// Strategy for generating valid player names.
///
/// # Panics
///
/// Panics if the internal regex is invalid (should never happen).
pub fn player_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z][a-z]{1,10}( [A-Z][a-z]{1,10})?").expect("valid regex")
}

/// Strategy for generating names that may fail validation.
///
/// # Panics
///
/// Panics if the internal regex is invalid (should never happen).
pub fn possibly_invalid_name() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => player_name(),
        2 => prop::string::string_regex("[A-Za-z0-9 _-]{0,12}").expect("valid regex"),
        1 => Just(String::new()),
        1 => Just("   ".to_string()),
    ]
}

/// Strategy for generating best-of lengths.
pub fn max_sets() -> impl Strategy<Value = u32> {
    prop_oneof![Just(3u32), Just(5u32)]
}

/// Strategy for generating starting biases.
pub fn starting_bias() -> impl Strategy<Value = i64> {
    prop_oneof![
        6 => 0i64..=100,        // Anywhere (60%)
        3 => 40i64..=60,        // Close matches (30%)
        1 => prop_oneof![Just(0i64), Just(100i64)], // Extremes (10%)
    ]
}

/// Strategy for generating point, game and set deltas.
pub fn deltas() -> impl Strategy<Value = (i32, i32, i32)> {
    prop_oneof![
        5 => Just((1, 2, 5)),                       // Defaults (50%)
        2 => Just((1, 1, 2)),                       // Lighter (20%)
        1 => Just((1, 0, 0)),                       // Points only (10%)
        2 => (0i32..=4, 0i32..=8, 0i32..=12),       // Arbitrary (20%)
    ]
}

/// Strategy for generating match seeds.
pub fn seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Strategy for generating valid, seeded configurations.
pub fn match_config() -> impl Strategy<Value = MatchConfig> {
    (
        player_name(),
        player_name(),
        max_sets(),
        starting_bias(),
        deltas(),
        seed(),
    )
        .prop_map(|(a, b, sets, bias, (point, game, set), seed)| {
            MatchConfig::new(a, b, sets, bias)
                .with_deltas(point, game, set)
                .with_seed(seed)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariants::{check_event_ordering, check_scoring, check_termination};
    use rally_engine::config::validate_name;
    use rally_engine::MatchEngine;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn generated_configs_are_valid(config in match_config()) {
            prop_assert!(config.validate().is_ok(), "{:?}", config);
            prop_assert!(config.seed.is_some());
        }

        #[test]
        fn validation_matches_name_shape(name in possibly_invalid_name()) {
            let trimmed = name.trim();
            let expected = !trimmed.is_empty()
                && trimmed.chars().all(|c| c.is_ascii_alphabetic() || c == ' ');
            prop_assert_eq!(validate_name(&name).is_ok(), expected);
        }

        #[test]
        fn generated_matches_hold_invariants(config in match_config()) {
            let events: Vec<_> = MatchEngine::new(config.clone()).collect();
            prop_assert_eq!(check_event_ordering(&events), Ok(()));
            prop_assert_eq!(check_termination(&config, &events), Ok(()));
            prop_assert_eq!(check_scoring(&config, &events), Ok(()));
        }
    }
}
