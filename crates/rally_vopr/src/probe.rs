//! Momentum probe.
//!
//! Plays a fixed best-of-three between evenly matched players over a range
//! of seeds and summarises the set scores, to eyeball how strongly a set of
//! momentum deltas pushes matches toward lopsided sets.

use rally_engine::{MatchConfig, MatchEngine, MatchEvent};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io;
use tracing::debug;

/// Number of sequences kept in [`ProbeReport::top`].
const TOP_SEQUENCES: usize = 5;

/// Game scores of every set in one match, in order.
pub type SetSequence = Vec<(u32, u32)>;

/// One momentum setting to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    /// Label printed with the report.
    pub label: String,
    /// Momentum added per point.
    pub point_delta: i32,
    /// Momentum added per game.
    pub game_delta: i32,
    /// Momentum added per set.
    pub set_delta: i32,
}

impl ProbeSettings {
    /// Creates a labelled setting.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        point_delta: i32,
        game_delta: i32,
        set_delta: i32,
    ) -> Self {
        Self {
            label: label.into(),
            point_delta,
            game_delta,
            set_delta,
        }
    }

    /// Default, lighter and points-only settings.
    #[must_use]
    pub fn standard() -> Vec<Self> {
        vec![
            Self::new("defaults pd=1 gd=2 sd=5", 1, 2, 5),
            Self::new("lighter gd=1 sd=2", 1, 1, 2),
            Self::new("points-only gd=0 sd=0", 1, 0, 0),
        ]
    }

    fn config(&self, seed: u64) -> MatchConfig {
        MatchConfig::new("A", "B", 3, 50)
            .with_seed(seed)
            .with_deltas(self.point_delta, self.game_delta, self.set_delta)
    }
}

/// Distribution of set scores for one setting.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    /// Setting label.
    pub label: String,
    /// Matches played.
    pub matches: usize,
    /// Sets played across all matches.
    pub total_sets: usize,
    /// Sets finishing 6-0 or 0-6.
    pub blowouts: usize,
    /// Most common set sequences with their counts, most frequent first.
    pub top: Vec<(SetSequence, usize)>,
}

impl ProbeReport {
    /// Share of sets that were blowouts.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn blowout_rate(&self) -> f64 {
        if self.total_sets == 0 {
            0.0
        } else {
            self.blowouts as f64 / self.total_sets as f64
        }
    }
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] matches: {}  total sets: {}  blowout rate: {:.3}",
            self.label,
            self.matches,
            self.total_sets,
            self.blowout_rate()
        )?;
        for (sequence, count) in &self.top {
            write!(f, "\n{count} {}", sequence_text(sequence))?;
        }
        Ok(())
    }
}

/// Renders a set sequence as `6-4 3-6 7-5`.
#[must_use]
pub fn sequence_text(sequence: &[(u32, u32)]) -> String {
    sequence
        .iter()
        .map(|(a, b)| format!("{a}-{b}"))
        .collect::<Vec<_>>()
        .join(" ")
}

const fn is_blowout((a, b): (u32, u32)) -> bool {
    matches!((a, b), (6, 0) | (0, 6))
}

/// Set scores of one match.
fn set_sequence(config: MatchConfig) -> SetSequence {
    MatchEngine::new(config)
        .filter_map(|event| match event {
            MatchEvent::Set(set) => Some(set.final_games),
            _ => None,
        })
        .collect()
}

/// Plays seeds `0..matches` under `settings` and summarises the results.
#[must_use]
pub fn run_probe(settings: &ProbeSettings, matches: usize) -> ProbeReport {
    // Counts keyed by sequence, with the index of first appearance for ties.
    let mut counts: HashMap<SetSequence, (usize, usize)> = HashMap::new();
    let mut total_sets = 0;
    let mut blowouts = 0;

    for seed in (0u64..).take(matches) {
        let sequence = set_sequence(settings.config(seed));
        total_sets += sequence.len();
        blowouts += sequence.iter().filter(|s| is_blowout(**s)).count();

        let first_seen = counts.len();
        counts.entry(sequence).or_insert((0, first_seen)).0 += 1;
    }

    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|(_, (count_a, seen_a)), (_, (count_b, seen_b))| {
        count_b.cmp(count_a).then(seen_a.cmp(seen_b))
    });
    let top = ranked
        .into_iter()
        .take(TOP_SEQUENCES)
        .map(|(sequence, (count, _))| (sequence, count))
        .collect();

    debug!(label = %settings.label, matches, total_sets, blowouts, "probe finished");

    ProbeReport {
        label: settings.label.clone(),
        matches,
        total_sets,
        blowouts,
        top,
    }
}

#[derive(Serialize)]
struct ProbeRow<'a> {
    label: &'a str,
    matches: usize,
    total_sets: usize,
    blowouts: usize,
    blowout_rate: f64,
    rank: usize,
    count: usize,
    sets: String,
}

/// Writes one CSV row per top sequence of each report.
///
/// # Errors
///
/// Returns an error if a row cannot be written.
pub fn write_csv<W: io::Write>(reports: &[ProbeReport], writer: W) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for report in reports {
        for (rank, (sequence, count)) in report.top.iter().enumerate() {
            csv_writer.serialize(ProbeRow {
                label: &report.label,
                matches: report.matches,
                total_sets: report.total_sets,
                blowouts: report.blowouts,
                blowout_rate: report.blowout_rate(),
                rank: rank + 1,
                count: *count,
                sets: sequence_text(sequence),
            })?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_settings() {
        let settings = ProbeSettings::standard();
        assert_eq!(settings.len(), 3);
        assert_eq!((settings[1].game_delta, settings[1].set_delta), (1, 2));
        assert_eq!((settings[2].game_delta, settings[2].set_delta), (0, 0));
    }

    #[test]
    fn report_counts_are_consistent() {
        let settings = &ProbeSettings::standard()[0];
        let report = run_probe(settings, 20);

        assert_eq!(report.matches, 20);
        // A best of three lasts two or three sets.
        assert!((40..=60).contains(&report.total_sets), "{}", report.total_sets);
        assert!(report.blowouts <= report.total_sets);
        assert!(!report.top.is_empty() && report.top.len() <= TOP_SEQUENCES);
        assert!(report.top.windows(2).all(|w| w[0].1 >= w[1].1));
        let listed: usize = report.top.iter().map(|(_, count)| count).sum();
        assert!(listed <= 20);
    }

    #[test]
    fn probe_is_reproducible() {
        let settings = &ProbeSettings::standard()[2];
        assert_eq!(run_probe(settings, 10), run_probe(settings, 10));
    }

    #[test]
    fn report_display_and_csv() {
        let report = ProbeReport {
            label: "defaults".to_string(),
            matches: 2,
            total_sets: 5,
            blowouts: 1,
            top: vec![(vec![(6, 0), (6, 4)], 1), (vec![(4, 6), (7, 5), (6, 3)], 1)],
        };

        assert_eq!(
            report.to_string(),
            "[defaults] matches: 2  total sets: 5  blowout rate: 0.200\n1 6-0 6-4\n1 4-6 7-5 6-3"
        );

        let mut out = Vec::new();
        write_csv(std::slice::from_ref(&report), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("label,matches,total_sets,blowouts,blowout_rate,rank,count,sets")
        );
        assert_eq!(lines.next(), Some("defaults,2,5,1,0.2,1,1,6-0 6-4"));
        assert_eq!(lines.count(), 1);
    }

    #[test]
    fn empty_probe_has_zero_rate() {
        let report = run_probe(&ProbeSettings::new("none", 1, 2, 5), 0);
        assert_eq!(report.total_sets, 0);
        assert!(report.blowout_rate().abs() < f64::EPSILON);
        assert!(report.top.is_empty());
    }
}
