//! Score bookkeeping and the tennis scoring rules.
//!
//! Games need four points and a two point margin. Sets need six games and a
//! two game margin, or seven games outright (there is no tiebreak, so 6-6
//! runs on until someone reaches seven).

use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// The first configured player.
    A,
    /// The second configured player. Bias is expressed in B's favour.
    B,
}

impl Player {
    /// Returns the other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// Mutable score and momentum state of one match in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreState {
    /// Sets won by A.
    pub sets_a: u32,
    /// Sets won by B.
    pub sets_b: u32,
    /// Games won by A in the current set.
    pub games_a: u32,
    /// Games won by B in the current set.
    pub games_b: u32,
    /// Points won by A in the current game.
    pub points_a: u32,
    /// Points won by B in the current game.
    pub points_b: u32,
    /// Base percent chance that B wins the next point, before serve adjustment.
    pub bias: i64,
    /// Net momentum: positive favours B, negative favours A.
    pub momentum_net: f64,
    /// Whether A serves the current game.
    pub server_is_a: bool,
}

impl ScoreState {
    /// Creates a fresh state at the given base bias with A serving.
    #[must_use]
    pub const fn new(bias: i64) -> Self {
        Self {
            sets_a: 0,
            sets_b: 0,
            games_a: 0,
            games_b: 0,
            points_a: 0,
            points_b: 0,
            bias,
            momentum_net: 0.0,
            server_is_a: true,
        }
    }

    /// The player serving the current game.
    #[must_use]
    pub const fn server(&self) -> Player {
        if self.server_is_a {
            Player::A
        } else {
            Player::B
        }
    }

    /// Points already played in the current game.
    #[must_use]
    pub const fn points_played(&self) -> u32 {
        self.points_a + self.points_b
    }

    /// Credits a point to `player`.
    pub fn award_point(&mut self, player: Player) {
        match player {
            Player::A => self.points_a += 1,
            Player::B => self.points_b += 1,
        }
    }

    /// Credits a game to `player` and clears the point score.
    pub fn award_game(&mut self, player: Player) {
        match player {
            Player::A => self.games_a += 1,
            Player::B => self.games_b += 1,
        }
        self.points_a = 0;
        self.points_b = 0;
    }

    /// Credits a set to `player`. Games are left for [`Self::reset_games`].
    pub fn award_set(&mut self, player: Player) {
        match player {
            Player::A => self.sets_a += 1,
            Player::B => self.sets_b += 1,
        }
    }

    /// Clears the game score for a new set.
    pub fn reset_games(&mut self) {
        self.games_a = 0;
        self.games_b = 0;
    }

    /// Hands serve to the other player.
    pub fn switch_server(&mut self) {
        self.server_is_a = !self.server_is_a;
    }

    /// Current game tally as `(games_a, games_b)`.
    #[must_use]
    pub const fn games(&self) -> (u32, u32) {
        (self.games_a, self.games_b)
    }

    /// Current set tally as `(sets_a, sets_b)`.
    #[must_use]
    pub const fn sets(&self) -> (u32, u32) {
        (self.sets_a, self.sets_b)
    }
}

/// Label for a point count below deuce.
const fn point_label(points: u32) -> &'static str {
    match points {
        0 => "Love",
        1 => "15",
        2 => "30",
        _ => "40",
    }
}

/// Renders the score within a game, e.g. `"15 - Love"`, `"Deuce"` or `"Ad Ann"`.
#[must_use]
pub fn game_score_text(points_a: u32, points_b: u32, name_a: &str, name_b: &str) -> String {
    if points_a >= 3 && points_b >= 3 {
        if points_a == points_b {
            return "Deuce".to_string();
        }
        if points_a == points_b + 1 {
            return format!("Ad {name_a}");
        }
        if points_b == points_a + 1 {
            return format!("Ad {name_b}");
        }
    }
    format!("{} - {}", point_label(points_a), point_label(points_b))
}

/// Returns the game winner, if the point score closes the game.
#[must_use]
pub const fn game_winner(points_a: u32, points_b: u32) -> Option<Player> {
    if (points_a >= 4 || points_b >= 4) && points_a.abs_diff(points_b) >= 2 {
        Some(if points_a > points_b { Player::A } else { Player::B })
    } else {
        None
    }
}

/// Returns the set winner, if the game score closes the set.
#[must_use]
pub const fn set_winner(games_a: u32, games_b: u32) -> Option<Player> {
    if (games_a >= 6 || games_b >= 6) && games_a.abs_diff(games_b) >= 2 {
        return Some(if games_a > games_b { Player::A } else { Player::B });
    }
    if games_a == 7 {
        return Some(Player::A);
    }
    if games_b == 7 {
        return Some(Player::B);
    }
    None
}
