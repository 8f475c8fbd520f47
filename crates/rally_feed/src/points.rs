//! Per-point feed for renderers.
//!
//! [`PointStream`] folds the engine's `game`, `set` and `match` events into
//! the record of the point that caused them, so a renderer can animate one
//! record per rally and show the scoreboard as it stands after that rally.
//! The only thing decided here is the cosmetic [`Reason`] a rally ended
//! with, drawn from an RNG separate from the match RNG.

use rally_engine::{FaultKind, MatchConfig, MatchEngine, MatchEvent, Player, PointEvent, ServeSide};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::iter::{FusedIterator, Peekable};
use tracing::trace;

/// How a rally visibly ended. Has no effect on who won it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Reason {
    /// Ball into the net.
    Net,
    /// Ball landed long or wide.
    Out,
    /// Ball not reached.
    Miss,
}

impl From<FaultKind> for Reason {
    fn from(kind: FaultKind) -> Self {
        match kind {
            FaultKind::Net => Self::Net,
            FaultKind::Out => Self::Out,
        }
    }
}

/// Everything a renderer needs to animate one point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointOutcome {
    /// Player serving the point.
    pub server: Player,
    /// Player receiving the point.
    pub receiver: Player,
    /// Court the serve was struck from.
    pub side: ServeSide,
    /// Point winner as decided by the engine.
    pub winner: Player,
    /// Cosmetic end of the rally.
    pub reason: Reason,
    /// Name of player A.
    pub name_a: String,
    /// Name of player B.
    pub name_b: String,
    /// Game score text from the engine.
    pub game_text: String,
    /// Games in the current set after this point.
    pub games: (u32, u32),
    /// Sets after this point.
    pub sets: (u32, u32),
    /// Best-of length.
    pub best_of: u32,
    /// Effective bias the engine reported with this point.
    pub bias: i64,
    /// Whether this point ended the match.
    pub match_over: bool,
    /// Match winner, on the final point only.
    pub match_winner_name: Option<String>,
    /// Failed serve attempts before the rally.
    pub serve_faults: u8,
    /// Kind of each failed serve attempt.
    pub serve_fault_kinds: Vec<FaultKind>,
}

/// Iterator of [`PointOutcome`]s over an event stream.
#[derive(Debug)]
pub struct PointStream<I: Iterator<Item = MatchEvent>> {
    events: Peekable<I>,
    rng: ChaCha8Rng,
    name_a: String,
    name_b: String,
    best_of: u32,
    games: (u32, u32),
    sets: (u32, u32),
    points_in_game: u32,
    finished: bool,
}

impl PointStream<MatchEngine> {
    /// Runs a fresh engine for `config` and feeds its events.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        let seed = config.seed;
        Self::from_events(MatchEngine::new(config), seed)
    }
}

impl<I: Iterator<Item = MatchEvent>> PointStream<I> {
    /// Feeds an existing event stream.
    ///
    /// `seed` drives the cosmetic reasons; `None` draws from OS entropy.
    pub fn from_events(events: I, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        Self {
            events: events.peekable(),
            rng,
            name_a: String::new(),
            name_b: String::new(),
            best_of: 0,
            games: (0, 0),
            sets: (0, 0),
            points_in_game: 0,
            finished: false,
        }
    }

    fn name(&self, player: Player) -> &str {
        match player {
            Player::A => &self.name_a,
            Player::B => &self.name_b,
        }
    }

    fn pick_reason(&mut self, point: &PointEvent, first_of_game: bool) -> Reason {
        let roll: f64 = self.rng.gen();
        if point.is_double_fault() {
            return point
                .serve_fault_kinds
                .last()
                .map_or(Reason::Out, |kind| Reason::from(*kind));
        }
        if first_of_game {
            if roll < 0.4 {
                Reason::Net
            } else if roll < 0.75 {
                Reason::Out
            } else {
                Reason::Miss
            }
        } else if roll < 0.6 {
            Reason::Miss
        } else if roll < 0.85 {
            Reason::Out
        } else {
            Reason::Net
        }
    }

    /// Applies a non-point event to the scoreboard.
    ///
    /// Returns the match winner's name for the `match` event.
    fn absorb(&mut self, event: MatchEvent) -> Option<String> {
        match event {
            MatchEvent::Start(start) => {
                self.name_a = start.player_a;
                self.name_b = start.player_b;
                self.best_of = start.max_sets;
                None
            }
            MatchEvent::Game(game) => {
                self.games = game.set_score;
                None
            }
            MatchEvent::Set(set) => {
                match set.winner_side {
                    Player::A => self.sets.0 += 1,
                    Player::B => self.sets.1 += 1,
                }
                self.games = (0, 0);
                None
            }
            MatchEvent::Match(result) => {
                self.sets = result.final_sets;
                self.finished = true;
                Some(result.winner)
            }
            MatchEvent::Point(_) => None,
        }
    }

    fn outcome(&mut self, point: PointEvent) -> PointOutcome {
        let first_of_game = self.points_in_game == 0;
        let reason = self.pick_reason(&point, first_of_game);

        let mut match_winner_name = None;
        if point.ends_game() {
            self.points_in_game = 0;
            while self
                .events
                .peek()
                .is_some_and(|next| !matches!(next, MatchEvent::Point(_)))
            {
                let Some(event) = self.events.next() else {
                    break;
                };
                if let Some(winner) = self.absorb(event) {
                    match_winner_name = Some(winner);
                    break;
                }
            }
        } else {
            self.points_in_game += 1;
        }

        let server = point.server();
        trace!(
            winner = self.name(point.winner_side),
            ?reason,
            games_a = self.games.0,
            games_b = self.games.1,
            "point outcome"
        );

        PointOutcome {
            server,
            receiver: server.opponent(),
            side: point.serve_side,
            winner: point.winner_side,
            reason,
            name_a: self.name_a.clone(),
            name_b: self.name_b.clone(),
            game_text: point.game_text,
            games: self.games,
            sets: self.sets,
            best_of: self.best_of,
            bias: point.bias,
            match_over: match_winner_name.is_some(),
            match_winner_name,
            serve_faults: point.serve_faults,
            serve_fault_kinds: point.serve_fault_kinds,
        }
    }
}

impl<I: Iterator<Item = MatchEvent>> Iterator for PointStream<I> {
    type Item = PointOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            match self.events.next()? {
                MatchEvent::Point(point) => return Some(self.outcome(point)),
                other => {
                    self.absorb(other);
                }
            }
        }
        None
    }
}

impl<I: Iterator<Item = MatchEvent>> FusedIterator for PointStream<I> {}
