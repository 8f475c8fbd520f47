//! Invariant checks over a recorded event stream.
//!
//! Each check replays the events of one finished match and returns a
//! description of the first violation it finds.

use rally_engine::score::{game_score_text, game_winner, set_winner};
use rally_engine::{MatchConfig, MatchEvent, Player, ServeSide};

/// Outcome of a single invariant check.
pub type CheckResult = std::result::Result<(), String>;

/// The stream starts once, ends with `match`, and `game`/`set`/`match`
/// events only ever follow the point or game that caused them.
///
/// # Errors
///
/// Returns a description of the first ordering violation.
pub fn check_event_ordering(events: &[MatchEvent]) -> CheckResult {
    let mut previous: Option<&MatchEvent> = None;

    for (index, event) in events.iter().enumerate() {
        let ok = match event {
            MatchEvent::Start(_) => previous.is_none(),
            MatchEvent::Point(_) => match previous {
                Some(MatchEvent::Point(p)) => !p.ends_game(),
                Some(MatchEvent::Start(_) | MatchEvent::Game(_) | MatchEvent::Set(_)) => true,
                Some(MatchEvent::Match(_)) | None => false,
            },
            MatchEvent::Game(_) => matches!(previous, Some(MatchEvent::Point(p)) if p.ends_game()),
            MatchEvent::Set(_) => matches!(previous, Some(MatchEvent::Game(_))),
            MatchEvent::Match(_) => matches!(previous, Some(MatchEvent::Set(_))),
        };
        if !ok {
            let after = previous.map_or("nothing", MatchEvent::kind);
            return Err(format!(
                "event {index}: '{}' may not follow '{after}'",
                event.kind()
            ));
        }
        previous = Some(event);
    }

    match previous {
        Some(MatchEvent::Match(_)) => Ok(()),
        Some(last) => Err(format!("stream ended on '{}' instead of 'match'", last.kind())),
        None => Err("empty event stream".to_string()),
    }
}

/// Exactly one `match` event, and the winner holds the required sets.
///
/// # Errors
///
/// Returns a description of the violation.
pub fn check_termination(config: &MatchConfig, events: &[MatchEvent]) -> CheckResult {
    let results: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            MatchEvent::Match(result) => Some(result),
            _ => None,
        })
        .collect();
    let [result] = results.as_slice() else {
        return Err(format!("expected one match event, found {}", results.len()));
    };

    let target = config.sets_to_win();
    let (a, b) = result.final_sets;
    let winner = if a > b { Player::A } else { Player::B };
    if a.max(b) != target || a.min(b) >= target {
        return Err(format!("final sets {a}-{b} do not decide a best of {}", config.max_sets));
    }
    if result.winner_side != winner {
        return Err(format!("match awarded to {} at {a}-{b}", result.winner_side));
    }
    Ok(())
}

/// Every reported bias lies within `floor..=ceiling`.
///
/// # Errors
///
/// Returns the first out-of-range bias.
pub fn check_bias_bounds(events: &[MatchEvent], floor: i64, ceiling: i64) -> CheckResult {
    for (index, event) in events.iter().enumerate() {
        if let MatchEvent::Point(point) = event {
            if !(floor..=ceiling).contains(&point.bias) {
                return Err(format!("event {index}: bias {} out of range", point.bias));
            }
        }
    }
    Ok(())
}

/// Game text, game tallies and set results follow tennis scoring.
///
/// # Errors
///
/// Returns a description of the first scoring mismatch.
pub fn check_scoring(config: &MatchConfig, events: &[MatchEvent]) -> CheckResult {
    let (mut points_a, mut points_b) = (0u32, 0u32);
    let (mut games_a, mut games_b) = (0u32, 0u32);
    let (mut sets_a, mut sets_b) = (0u32, 0u32);

    for (index, event) in events.iter().enumerate() {
        match event {
            MatchEvent::Point(point) => {
                match point.winner_side {
                    Player::A => points_a += 1,
                    Player::B => points_b += 1,
                }
                let expected = match game_winner(points_a, points_b) {
                    Some(Player::A) => format!("Game {}", config.player_a),
                    Some(Player::B) => format!("Game {}", config.player_b),
                    None => game_score_text(points_a, points_b, &config.player_a, &config.player_b),
                };
                if point.game_text != expected {
                    return Err(format!(
                        "event {index}: game text '{}' at {points_a}-{points_b}, expected '{expected}'",
                        point.game_text
                    ));
                }
            }
            MatchEvent::Game(game) => {
                if game_winner(points_a, points_b) != Some(game.winner_side) {
                    return Err(format!("event {index}: game awarded at {points_a}-{points_b}"));
                }
                if set_winner(games_a, games_b).is_some() {
                    return Err(format!("event {index}: game played after set closed"));
                }
                match game.winner_side {
                    Player::A => games_a += 1,
                    Player::B => games_b += 1,
                }
                if game.set_score != (games_a, games_b) {
                    return Err(format!(
                        "event {index}: set score {:?}, expected {:?}",
                        game.set_score,
                        (games_a, games_b)
                    ));
                }
                points_a = 0;
                points_b = 0;
            }
            MatchEvent::Set(set) => {
                if set_winner(games_a, games_b) != Some(set.winner_side)
                    || set.final_games != (games_a, games_b)
                {
                    return Err(format!("event {index}: set awarded at {games_a}-{games_b}"));
                }
                match set.winner_side {
                    Player::A => sets_a += 1,
                    Player::B => sets_b += 1,
                }
                games_a = 0;
                games_b = 0;
            }
            MatchEvent::Match(result) => {
                if result.final_sets != (sets_a, sets_b) {
                    return Err(format!(
                        "event {index}: final sets {:?}, counted {:?}",
                        result.final_sets,
                        (sets_a, sets_b)
                    ));
                }
            }
            MatchEvent::Start(_) => {}
        }
    }
    Ok(())
}

/// Server holds for a whole game and changes between games; the serve side
/// follows the parity of points played in the game.
///
/// # Errors
///
/// Returns a description of the first serve violation.
pub fn check_serve_alternation(events: &[MatchEvent]) -> CheckResult {
    let mut current: Option<bool> = None;
    let mut previous_game: Option<bool> = None;
    let mut played = 0u32;

    for (index, event) in events.iter().enumerate() {
        match event {
            MatchEvent::Point(point) => {
                match current {
                    Some(server) if server != point.server_is_a => {
                        return Err(format!("event {index}: server changed mid-game"));
                    }
                    Some(_) => {}
                    None => {
                        let expected = previous_game.map_or(true, |prev| !prev);
                        if point.server_is_a != expected {
                            return Err(format!("event {index}: server did not alternate"));
                        }
                        current = Some(point.server_is_a);
                    }
                }
                if point.serve_side != ServeSide::for_points_played(played) {
                    return Err(format!(
                        "event {index}: served from {} after {played} points",
                        point.serve_side
                    ));
                }
                if point.is_double_fault() && point.winner_side == point.server() {
                    return Err(format!("event {index}: server won on a double fault"));
                }
                played += 1;
            }
            MatchEvent::Game(_) => {
                previous_game = current.take();
                played = 0;
            }
            _ => {}
        }
    }
    Ok(())
}
