//! Momentum feedback and bias computation.
//!
//! Momentum accumulates half of each configured delta toward whoever won a
//! point, game or set. The base bias is always recomputed from the fixed
//! starting bias plus damped momentum, then clamped so that neither player
//! ever drops below a floor chance of winning a point.

#![allow(clippy::cast_possible_truncation)] // bias values are clamped to 0..=100
#![allow(clippy::cast_precision_loss)] // configured biases and deltas are small

use crate::config::{EngineTuning, MatchConfig};
use crate::score::{Player, ScoreState};

/// Half-deltas applied to momentum for each kind of win.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumModel {
    starting_bias: f64,
    point_step: f64,
    game_step: f64,
    set_step: f64,
    damping: f64,
    floor: i64,
    ceiling: i64,
    server_advantage: i64,
}

impl MomentumModel {
    /// Builds the model for a configuration and tuning.
    #[must_use]
    pub fn new(config: &MatchConfig, tuning: &EngineTuning) -> Self {
        Self {
            starting_bias: config.starting_bias as f64,
            point_step: f64::from(config.point_delta) * 0.5,
            game_step: f64::from(config.game_delta) * 0.5,
            set_step: f64::from(config.set_delta) * 0.5,
            damping: tuning.momentum_damping,
            floor: tuning.bias_floor,
            ceiling: tuning.bias_ceiling,
            server_advantage: tuning.server_advantage,
        }
    }

    /// The base bias a match starts at: the configured starting bias, clamped.
    #[must_use]
    pub fn initial_bias(&self) -> i64 {
        self.clamp(self.starting_bias as i64)
    }

    /// Shifts momentum after a point.
    pub fn on_point(&self, state: &mut ScoreState, winner: Player) {
        self.shift(state, winner, self.point_step);
    }

    /// Shifts momentum after a game.
    pub fn on_game(&self, state: &mut ScoreState, winner: Player) {
        self.shift(state, winner, self.game_step);
    }

    /// Shifts momentum after a set.
    pub fn on_set(&self, state: &mut ScoreState, winner: Player) {
        self.shift(state, winner, self.set_step);
    }

    /// Bias used for the next point draw, including server advantage.
    ///
    /// Never written back into the state.
    #[must_use]
    pub fn effective_bias(&self, state: &ScoreState) -> i64 {
        let adjustment = if state.server_is_a {
            -self.server_advantage
        } else {
            self.server_advantage
        };
        self.clamp(state.bias + adjustment)
    }

    fn shift(&self, state: &mut ScoreState, winner: Player, step: f64) {
        match winner {
            Player::A => state.momentum_net -= step,
            Player::B => state.momentum_net += step,
        }
        state.bias = self.recompute(state.momentum_net);
    }

    // Plain multiply-add: a fused mul_add rounds differently.
    #[allow(clippy::suboptimal_flops)]
    fn recompute(&self, momentum_net: f64) -> i64 {
        let base = self.starting_bias + self.damping * momentum_net;
        let clamped = base.clamp(self.floor as f64, self.ceiling as f64);
        clamped.round() as i64
    }

    fn clamp(&self, bias: i64) -> i64 {
        bias.clamp(self.floor, self.ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn model(starting_bias: i64) -> MomentumModel {
        MomentumModel::new(
            &MatchConfig::new("Ann", "Bo", 3, starting_bias),
            &EngineTuning::default(),
        )
    }

    #[test]
    fn initial_bias_is_clamped() {
        assert_eq!(model(0).initial_bias(), 10);
        assert_eq!(model(100).initial_bias(), 90);
        assert_eq!(model(42).initial_bias(), 42);
    }

    #[test]
    fn point_shifts_half_delta_toward_winner() {
        let m = model(50);
        let mut state = ScoreState::new(50);

        m.on_point(&mut state, Player::B);
        assert!((state.momentum_net - 0.5).abs() < f64::EPSILON);
        // 50 + 0.8 * 0.5 = 50.4
        assert_eq!(state.bias, 50);

        m.on_point(&mut state, Player::B);
        // 50 + 0.8 * 1.0 = 50.8
        assert_eq!(state.bias, 51);

        m.on_point(&mut state, Player::A);
        m.on_point(&mut state, Player::A);
        m.on_point(&mut state, Player::A);
        assert!((state.momentum_net + 0.5).abs() < f64::EPSILON);
        assert_eq!(state.bias, 50);
    }

    #[test]
    fn game_and_set_steps_use_their_deltas() {
        let m = model(50);
        let mut state = ScoreState::new(50);

        m.on_game(&mut state, Player::A);
        assert!((state.momentum_net + 1.0).abs() < f64::EPSILON);
        assert_eq!(state.bias, 49);

        m.on_set(&mut state, Player::A);
        // -1.0 - 2.5 = -3.5, 50 - 2.8 = 47.2
        assert_eq!(state.bias, 47);
    }

    #[test]
    fn bias_recomputes_from_unclamped_anchor() {
        let m = model(100);
        let mut state = ScoreState::new(m.initial_bias());
        assert_eq!(state.bias, 90);

        // 100 - 0.8 * 2.5 = 98, still clamped
        m.on_set(&mut state, Player::A);
        assert_eq!(state.bias, 90);

        for _ in 0..5 {
            m.on_set(&mut state, Player::A);
        }
        // momentum -15, 100 - 12 = 88
        assert_eq!(state.bias, 88);
    }

    #[test]
    fn effective_bias_favours_server() {
        let m = model(50);
        let mut state = ScoreState::new(50);
        assert_eq!(m.effective_bias(&state), 47);

        state.switch_server();
        assert_eq!(m.effective_bias(&state), 53);

        state.bias = 89;
        assert_eq!(m.effective_bias(&state), 90);
        state.switch_server();
        state.bias = 11;
        assert_eq!(m.effective_bias(&state), 10);
        assert_eq!(state.bias, 11);
    }

    fn outcome() -> impl Strategy<Value = (u8, bool)> {
        (0u8..3, any::<bool>())
    }

    proptest! {
        #[test]
        fn bias_stays_in_bounds(
            starting_bias in 0i64..=100,
            deltas in (-20i32..=20, -20i32..=20, -20i32..=20),
            outcomes in prop::collection::vec(outcome(), 0..400),
        ) {
            let config = MatchConfig::new("Ann", "Bo", 3, starting_bias)
                .with_deltas(deltas.0, deltas.1, deltas.2);
            let m = MomentumModel::new(&config, &EngineTuning::default());
            let mut state = ScoreState::new(m.initial_bias());
            prop_assert!((10..=90).contains(&state.bias));

            for (kind, b_won) in outcomes {
                let winner = if b_won { Player::B } else { Player::A };
                match kind {
                    0 => m.on_point(&mut state, winner),
                    1 => m.on_game(&mut state, winner),
                    _ => m.on_set(&mut state, winner),
                }
                prop_assert!((10..=90).contains(&state.bias));
                prop_assert!((10..=90).contains(&m.effective_bias(&state)));
            }
        }
    }
}
