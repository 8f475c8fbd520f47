//! The match simulation engine.
//!
//! [`MatchEngine`] is an explicit state machine behind the [`Iterator`]
//! interface. Each call to `next` either drains an event already decided or
//! plays exactly one more point, so the RNG is only advanced when the caller
//! asks for more of the match. A point draws, in order: the serve rolls (see
//! [`crate::serve::serve`]) and then, unless it was a double fault, one
//! uniform integer in `0..100` that B must beat the effective bias with.

use crate::config::{EngineTuning, MatchConfig};
use crate::error::Result;
use crate::event::{GameEvent, MatchEvent, MatchResult, PointEvent, SetEvent, StartEvent};
use crate::momentum::MomentumModel;
use crate::score::{self, Player, ScoreState};
use crate::serve::{self, ServeSide};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::iter::FusedIterator;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NotStarted,
    InPlay,
    Finished,
}

/// Seeded generator of the events of one match.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    config: MatchConfig,
    tuning: EngineTuning,
    momentum: MomentumModel,
    state: ScoreState,
    rng: ChaCha8Rng,
    phase: Phase,
    pending: VecDeque<MatchEvent>,
    points_played: u64,
}

impl MatchEngine {
    /// Creates an engine with the default model constants.
    ///
    /// The configuration is trusted; run [`MatchConfig::validate`] first or
    /// use [`MatchEngine::checked`].
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self::with_tuning(config, EngineTuning::default())
    }

    /// Creates an engine after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first configuration rule violated.
    pub fn checked(config: MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Creates an engine with custom model constants.
    #[must_use]
    pub fn with_tuning(config: MatchConfig, tuning: EngineTuning) -> Self {
        let rng = config
            .seed
            .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        let momentum = MomentumModel::new(&config, &tuning);
        let state = ScoreState::new(momentum.initial_bias());

        Self {
            config,
            tuning,
            momentum,
            state,
            rng,
            phase: Phase::NotStarted,
            pending: VecDeque::new(),
            points_played: 0,
        }
    }

    /// The configuration this engine was built from.
    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Current score and momentum.
    #[must_use]
    pub const fn state(&self) -> &ScoreState {
        &self.state
    }

    /// Points simulated so far.
    #[must_use]
    pub const fn points_played(&self) -> u64 {
        self.points_played
    }

    /// Whether the match has been decided.
    ///
    /// Buffered events may still be waiting to be drained.
    #[must_use]
    pub fn is_decided(&self) -> bool {
        self.phase == Phase::Finished
    }

    fn name(&self, player: Player) -> &str {
        match player {
            Player::A => &self.config.player_a,
            Player::B => &self.config.player_b,
        }
    }

    fn start(&mut self) -> MatchEvent {
        self.phase = Phase::InPlay;
        debug!(
            player_a = %self.config.player_a,
            player_b = %self.config.player_b,
            max_sets = self.config.max_sets,
            seed = ?self.config.seed,
            "match started"
        );
        MatchEvent::Start(StartEvent {
            player_a: self.config.player_a.clone(),
            player_b: self.config.player_b.clone(),
            max_sets: self.config.max_sets,
        })
    }

    fn play_point(&mut self) {
        let server = self.state.server();
        let serve_side = ServeSide::for_points_played(self.state.points_played());

        let outcome = serve::serve(&mut self.rng, &self.tuning);
        let winner = if outcome.is_double_fault() {
            server.opponent()
        } else if self.rng.gen_range(0..100_i64) < self.momentum.effective_bias(&self.state) {
            Player::B
        } else {
            Player::A
        };

        self.state.award_point(winner);
        self.momentum.on_point(&mut self.state, winner);
        self.points_played += 1;

        let game_winner = score::game_winner(self.state.points_a, self.state.points_b);
        let game_text = match game_winner {
            Some(player) => format!("Game {}", self.name(player)),
            None => score::game_score_text(
                self.state.points_a,
                self.state.points_b,
                &self.config.player_a,
                &self.config.player_b,
            ),
        };

        // Only a game won in a rally moves momentum beyond the point itself.
        if let Some(player) = game_winner {
            self.state.award_game(player);
            if !outcome.is_double_fault() {
                self.momentum.on_game(&mut self.state, player);
            }
        }
        let bias = self.momentum.effective_bias(&self.state);

        trace!(
            point = self.points_played,
            winner = %winner,
            bias,
            faults = outcome.fault_count(),
            %game_text,
            "point played"
        );

        self.pending.push_back(MatchEvent::Point(PointEvent {
            winner: self.name(winner).to_string(),
            winner_side: winner,
            game_text,
            bias,
            server_is_a: server == Player::A,
            serve_side,
            serve_faults: outcome.fault_count(),
            serve_fault_kinds: outcome.faults,
        }));

        if let Some(player) = game_winner {
            self.close_game(player);
        }
    }

    fn close_game(&mut self, winner: Player) {
        self.pending.push_back(MatchEvent::Game(GameEvent {
            winner: self.name(winner).to_string(),
            winner_side: winner,
            set_score: self.state.games(),
        }));

        let set_closed = score::set_winner(self.state.games_a, self.state.games_b);
        if let Some(set_winner) = set_closed {
            self.close_set(set_winner);
        }

        self.state.switch_server();

        let target = self.config.sets_to_win();
        if set_closed.is_some() && (self.state.sets_a >= target || self.state.sets_b >= target) {
            self.close_match();
        }
    }

    fn close_set(&mut self, winner: Player) {
        let final_games = self.state.games();
        self.state.award_set(winner);
        self.momentum.on_set(&mut self.state, winner);
        debug!(
            winner = %self.name(winner),
            games_a = final_games.0,
            games_b = final_games.1,
            bias = self.state.bias,
            "set completed"
        );
        self.pending.push_back(MatchEvent::Set(SetEvent {
            winner: self.name(winner).to_string(),
            winner_side: winner,
            final_games,
        }));
        self.state.reset_games();
    }

    fn close_match(&mut self) {
        let winner = if self.state.sets_a > self.state.sets_b {
            Player::A
        } else {
            Player::B
        };
        debug!(
            winner = %self.name(winner),
            sets_a = self.state.sets_a,
            sets_b = self.state.sets_b,
            points = self.points_played,
            "match completed"
        );
        self.pending.push_back(MatchEvent::Match(MatchResult {
            winner: self.name(winner).to_string(),
            winner_side: winner,
            final_sets: self.state.sets(),
        }));
        self.phase = Phase::Finished;
    }
}

impl Iterator for MatchEngine {
    type Item = MatchEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        match self.phase {
            Phase::NotStarted => Some(self.start()),
            Phase::InPlay => {
                self.play_point();
                self.pending.pop_front()
            }
            Phase::Finished => None,
        }
    }
}

impl FusedIterator for MatchEngine {}
