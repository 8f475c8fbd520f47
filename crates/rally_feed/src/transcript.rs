//! Console transcript of a match.
//!
//! Each event renders to zero or more lines of text. Names for the
//! scoreboard lines are taken from the `start` event.

use rally_engine::MatchEvent;
use std::fmt::Write as _;

/// Renders one event to console lines, given both player names.
#[must_use]
pub fn render_event(event: &MatchEvent, name_a: &str, name_b: &str) -> Vec<String> {
    match event {
        MatchEvent::Start(start) => vec![format!(
            "Start of play - {} vs {} - best out of {} sets",
            start.player_a, start.player_b, start.max_sets
        )],
        MatchEvent::Point(point) => {
            let headline = if point.ends_game() {
                format!("Point {}, {}", point.winner, point.game_text)
            } else {
                format!("Point {}, Game Score: {}", point.winner, point.game_text)
            };
            vec![headline, format!("Bias: {}", point.bias)]
        }
        MatchEvent::Game(game) => {
            let (a, b) = game.set_score;
            vec![format!("Set Score: {name_a} vs {name_b} {a} - {b}")]
        }
        MatchEvent::Set(set) => {
            let (a, b) = set.final_games;
            vec![format!(
                "Set won by {}. Games: {name_a} vs {name_b} {a} - {b}",
                set.winner
            )]
        }
        MatchEvent::Match(result) => {
            let (a, b) = result.final_sets;
            vec![format!(
                "Winner: {}. Final Score (sets): {name_a} vs {name_b} {a} - {b}",
                result.winner
            )]
        }
    }
}

/// Stateful renderer that remembers player names from the `start` event.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    name_a: String,
    name_b: String,
}

impl Transcript {
    /// Creates a transcript renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the lines for one event.
    pub fn lines(&mut self, event: &MatchEvent) -> Vec<String> {
        if let MatchEvent::Start(start) = event {
            self.name_a.clone_from(&start.player_a);
            self.name_b.clone_from(&start.player_b);
        }
        render_event(event, &self.name_a, &self.name_b)
    }

    /// Renders a whole event sequence as newline-terminated text.
    pub fn render_all<'a>(&mut self, events: impl IntoIterator<Item = &'a MatchEvent>) -> String {
        let mut out = String::new();
        for event in events {
            for line in self.lines(event) {
                let _ = writeln!(out, "{line}");
            }
        }
        out
    }
}
