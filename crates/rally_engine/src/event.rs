//! Events produced by the match engine.
//!
//! The stream is authoritative: consumers render or print these events and
//! never recompute scores or winners on their own. For every game, the
//! deciding [`MatchEvent::Point`] comes first, followed by
//! [`MatchEvent::Game`], then [`MatchEvent::Set`] if the game closed a set,
//! then [`MatchEvent::Match`] if the set closed the match. Nothing is
//! interleaved between them.

use crate::score::Player;
use crate::serve::{FaultKind, ServeSide};
use serde::{Deserialize, Serialize};

/// One step of a simulated match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchEvent {
    /// Play begins. Emitted exactly once, first.
    Start(StartEvent),
    /// A point was decided.
    Point(PointEvent),
    /// A game was decided.
    Game(GameEvent),
    /// A set was decided.
    Set(SetEvent),
    /// The match was decided. Always the final event.
    Match(MatchResult),
}

impl MatchEvent {
    /// Returns the event kind as it appears on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Start(_) => "start",
            Self::Point(_) => "point",
            Self::Game(_) => "game",
            Self::Set(_) => "set",
            Self::Match(_) => "match",
        }
    }
}

/// Payload of the `start` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartEvent {
    /// Name of player A.
    pub player_a: String,
    /// Name of player B.
    pub player_b: String,
    /// Best-of length.
    pub max_sets: u32,
}

/// Payload of the `point` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointEvent {
    /// Name of the point winner.
    pub winner: String,
    /// Side of the point winner.
    pub winner_side: Player,
    /// Game score after the point, or `"Game <name>"` if it closed the game.
    pub game_text: String,
    /// Effective sampling bias once the point (and a game it closed in a
    /// rally) has moved momentum.
    pub bias: i64,
    /// Whether A served the point.
    pub server_is_a: bool,
    /// Court the serve was struck from.
    pub serve_side: ServeSide,
    /// Failed serve attempts before the rally (2 means double fault).
    pub serve_faults: u8,
    /// Kind of each failed serve attempt.
    pub serve_fault_kinds: Vec<FaultKind>,
}

impl PointEvent {
    /// Whether this point closed its game.
    #[must_use]
    pub fn ends_game(&self) -> bool {
        self.game_text.starts_with("Game ")
    }

    /// Whether this point was a double fault.
    #[must_use]
    pub const fn is_double_fault(&self) -> bool {
        self.serve_faults >= 2
    }

    /// The player who served this point.
    #[must_use]
    pub const fn server(&self) -> Player {
        if self.server_is_a {
            Player::A
        } else {
            Player::B
        }
    }
}

/// Payload of the `game` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Name of the game winner.
    pub winner: String,
    /// Side of the game winner.
    pub winner_side: Player,
    /// Game tally in the current set after this game.
    pub set_score: (u32, u32),
}

/// Payload of the `set` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEvent {
    /// Name of the set winner.
    pub winner: String,
    /// Side of the set winner.
    pub winner_side: Player,
    /// Final game tally of the set.
    pub final_games: (u32, u32),
}

/// Payload of the `match` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Name of the match winner.
    pub winner: String,
    /// Side of the match winner.
    pub winner_side: Player,
    /// Final set tally.
    pub final_sets: (u32, u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_kind_tag() {
        let event = MatchEvent::Game(GameEvent {
            winner: "Ann".to_string(),
            winner_side: Player::A,
            set_score: (3, 2),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"game","winner":"Ann","winner_side":"A","set_score":[3,2]}"#
        );
        assert_eq!(event.kind(), "game");
    }

    #[test]
    fn point_event_roundtrips() {
        let event = MatchEvent::Point(PointEvent {
            winner: "Bo".to_string(),
            winner_side: Player::B,
            game_text: "Game Bo".to_string(),
            bias: 47,
            server_is_a: true,
            serve_side: ServeSide::Ad,
            serve_faults: 2,
            serve_fault_kinds: vec![FaultKind::Net, FaultKind::Out],
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""serve_side":"ad""#));
        assert!(json.contains(r#""serve_fault_kinds":["Net","Out"]"#));

        let parsed: MatchEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);

        let MatchEvent::Point(point) = parsed else {
            panic!("expected point");
        };
        assert!(point.ends_game());
        assert!(point.is_double_fault());
        assert_eq!(point.server(), Player::A);
    }
}
