//! First and second serve model.

use crate::config::EngineTuning;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half of the court the serve is struck from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServeSide {
    /// Right-hand court, used when an even number of points have been played.
    Deuce,
    /// Left-hand court, used when an odd number of points have been played.
    Ad,
}

impl ServeSide {
    /// Side for the next point given the points already played in the game.
    #[must_use]
    pub const fn for_points_played(points_played: u32) -> Self {
        if points_played % 2 == 0 {
            Self::Deuce
        } else {
            Self::Ad
        }
    }

    /// Returns the lowercase name used on the event stream.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deuce => "deuce",
            Self::Ad => "ad",
        }
    }
}

impl fmt::Display for ServeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a serve missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultKind {
    /// Serve caught the net.
    Net,
    /// Serve landed outside the service box.
    Out,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Net => f.write_str("Net"),
            Self::Out => f.write_str("Out"),
        }
    }
}

/// Result of the serve phase of one point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServeOutcome {
    /// Faults committed before the ball was in play, in order.
    pub faults: Vec<FaultKind>,
}

impl ServeOutcome {
    /// Number of failed serve attempts (0, 1 or 2).
    #[must_use]
    pub fn fault_count(&self) -> u8 {
        if self.faults.len() >= 2 {
            2
        } else {
            u8::from(!self.faults.is_empty())
        }
    }

    /// Both serves missed; the receiver takes the point.
    #[must_use]
    pub fn is_double_fault(&self) -> bool {
        self.faults.len() >= 2
    }
}

/// Plays out the serve phase of a point.
///
/// Draws, in order: the first-serve roll, then on a miss the fault-kind roll
/// and the second-serve roll, then on a second miss one more fault-kind roll.
pub fn serve<R: Rng + ?Sized>(rng: &mut R, tuning: &EngineTuning) -> ServeOutcome {
    let mut outcome = ServeOutcome::default();

    if attempt(rng, tuning.first_serve_in) {
        return outcome;
    }
    outcome.faults.push(fault_kind(rng, tuning));

    if attempt(rng, tuning.second_serve_in) {
        return outcome;
    }
    outcome.faults.push(fault_kind(rng, tuning));

    outcome
}

fn attempt<R: Rng + ?Sized>(rng: &mut R, prob_in: f64) -> bool {
    rng.gen::<f64>() < prob_in
}

fn fault_kind<R: Rng + ?Sized>(rng: &mut R, tuning: &EngineTuning) -> FaultKind {
    if rng.gen::<f64>() < tuning.net_fault_share {
        FaultKind::Net
    } else {
        FaultKind::Out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    // StepRng(0, 0) yields 0.0 for every f64 draw; StepRng(MAX, 0) yields
    // the largest value below 1.0.
    fn always_low() -> StepRng {
        StepRng::new(0, 0)
    }

    fn always_high() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn side_alternates_by_points_played() {
        assert_eq!(ServeSide::for_points_played(0), ServeSide::Deuce);
        assert_eq!(ServeSide::for_points_played(1), ServeSide::Ad);
        assert_eq!(ServeSide::for_points_played(2), ServeSide::Deuce);
        assert_eq!(ServeSide::for_points_played(7), ServeSide::Ad);
    }

    #[test]
    fn first_serve_in_has_no_faults() {
        let outcome = serve(&mut always_low(), &EngineTuning::default());
        assert_eq!(outcome.fault_count(), 0);
        assert!(!outcome.is_double_fault());
    }

    #[test]
    fn both_serves_missing_is_double_fault() {
        let outcome = serve(&mut always_high(), &EngineTuning::default());
        assert_eq!(outcome.faults, vec![FaultKind::Out, FaultKind::Out]);
        assert_eq!(outcome.fault_count(), 2);
        assert!(outcome.is_double_fault());
    }

    #[test]
    fn fault_kind_follows_net_share() {
        let tuning = EngineTuning {
            net_fault_share: 1.0,
            ..EngineTuning::default()
        };
        let outcome = serve(&mut always_high(), &tuning);
        assert_eq!(outcome.faults, vec![FaultKind::Net, FaultKind::Net]);
    }

    #[test]
    fn second_serve_can_rescue_point() {
        let tuning = EngineTuning {
            first_serve_in: 0.0,
            second_serve_in: 1.0,
            ..EngineTuning::default()
        };
        let outcome = serve(&mut always_high(), &tuning);
        assert_eq!(outcome.faults, vec![FaultKind::Out]);
        assert_eq!(outcome.fault_count(), 1);
    }

    #[test]
    fn side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ServeSide::Ad).unwrap(), "\"ad\"");
        assert_eq!(serde_json::to_string(&FaultKind::Net).unwrap(), "\"Net\"");
    }
}
