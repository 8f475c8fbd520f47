//! Simulation scenarios and results.

use rally_engine::MatchConfig;
use std::fmt;

/// A test scenario to run in the simulation.
///
/// Every scenario plays many matches from `config`, replacing its seed with
/// seeds drawn from the harness.
#[derive(Debug, Clone)]
pub enum Scenario {
    /// Same seed and config replay to the same event stream.
    Determinism {
        /// Base match configuration.
        config: MatchConfig,
    },
    /// Every match ends with exactly one decisive `match` event.
    Termination {
        /// Base match configuration.
        config: MatchConfig,
    },
    /// Bias stays within its floor and ceiling at every step.
    BiasBounds {
        /// Base match configuration.
        config: MatchConfig,
    },
    /// Game text, game tallies and sets follow tennis scoring.
    ScoringRules {
        /// Base match configuration.
        config: MatchConfig,
    },
    /// Serve changes hands once per game and alternates court per point.
    ServeAlternation {
        /// Base match configuration.
        config: MatchConfig,
    },
    /// `game`, `set` and `match` events follow the point that caused them.
    EventOrdering {
        /// Base match configuration.
        config: MatchConfig,
    },
}

impl Scenario {
    /// Returns every scenario for one base configuration.
    #[must_use]
    pub fn all(config: &MatchConfig) -> Vec<Self> {
        vec![
            Self::Determinism {
                config: config.clone(),
            },
            Self::Termination {
                config: config.clone(),
            },
            Self::BiasBounds {
                config: config.clone(),
            },
            Self::ScoringRules {
                config: config.clone(),
            },
            Self::ServeAlternation {
                config: config.clone(),
            },
            Self::EventOrdering {
                config: config.clone(),
            },
        ]
    }

    /// Returns the base configuration.
    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        match self {
            Self::Determinism { config }
            | Self::Termination { config }
            | Self::BiasBounds { config }
            | Self::ScoringRules { config }
            | Self::ServeAlternation { config }
            | Self::EventOrdering { config } => config,
        }
    }

    /// Returns the name of this scenario.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Determinism { .. } => "determinism",
            Self::Termination { .. } => "termination",
            Self::BiasBounds { .. } => "bias_bounds",
            Self::ScoringRules { .. } => "scoring_rules",
            Self::ServeAlternation { .. } => "serve_alternation",
            Self::EventOrdering { .. } => "event_ordering",
        }
    }
}

/// Result of running a simulation scenario.
#[derive(Debug, Clone)]
pub struct SimResult {
    /// Name of the test.
    pub name: String,
    /// Whether the test passed.
    pub passed: bool,
    /// Whether the test was skipped.
    pub skipped: bool,
    /// Human-readable message.
    pub message: String,
    /// Detailed diagnostics (if any).
    pub diagnostics: Vec<String>,
}

impl SimResult {
    /// Creates a passing result.
    #[must_use]
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            skipped: false,
            message: message.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Creates a failing result.
    #[must_use]
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            skipped: false,
            message: message.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Creates a skipped result.
    #[must_use]
    pub fn skip(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            skipped: true,
            message: reason.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Adds a diagnostic message.
    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostics.push(diagnostic.into());
        self
    }
}

impl fmt::Display for SimResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.skipped {
            "SKIP"
        } else if self.passed {
            "PASS"
        } else {
            "FAIL"
        };

        write!(f, "[{status}] {}: {}", self.name, self.message)?;

        for diag in &self.diagnostics {
            write!(f, "\n  - {diag}")?;
        }

        Ok(())
    }
}

/// Aggregated results from multiple scenarios.
#[derive(Debug, Default)]
pub struct SimSummary {
    /// Total number of tests.
    pub total: usize,
    /// Number of passed tests.
    pub passed: usize,
    /// Number of failed tests.
    pub failed: usize,
    /// Number of skipped tests.
    pub skipped: usize,
    /// Individual results.
    pub results: Vec<SimResult>,
}

impl SimSummary {
    /// Creates a summary from a list of results.
    #[must_use]
    pub fn from_results(results: Vec<SimResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed && !r.skipped).count();
        let skipped = results.iter().filter(|r| r.skipped).count();
        let failed = total - passed - skipped;

        Self {
            total,
            passed,
            failed,
            skipped,
            results,
        }
    }

    /// Returns true if all invariants held (no failures).
    #[must_use]
    pub const fn all_invariants_held(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for SimSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Summary")?;
        writeln!(f, "==================")?;
        writeln!(f, "Total:   {}", self.total)?;
        writeln!(f, "Passed:  {}", self.passed)?;
        writeln!(f, "Failed:  {}", self.failed)?;
        writeln!(f, "Skipped: {}", self.skipped)?;
        writeln!(f)?;

        for result in &self.results {
            writeln!(f, "{result}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_result_display() {
        let result = SimResult::pass("termination", "200 matches decided")
            .with_diagnostic("longest match: 312 points");
        let text = result.to_string();
        assert!(text.starts_with("[PASS] termination"));
        assert!(text.contains("\n  - longest match: 312 points"));

        let result = SimResult::fail("scoring_rules", "seed 7: bad game text");
        assert!(result.to_string().contains("FAIL"));
    }

    #[test]
    fn sim_summary_aggregation() {
        let results = vec![
            SimResult::pass("a", "ok"),
            SimResult::fail("b", "not ok"),
            SimResult::skip("c", "skipped"),
        ];

        let summary = SimSummary::from_results(results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert!(!summary.all_invariants_held());
    }

    #[test]
    fn all_scenarios_have_distinct_names() {
        let config = MatchConfig::new("Ann", "Bo", 3, 50);
        let scenarios = Scenario::all(&config);
        let mut names: Vec<_> = scenarios.iter().map(Scenario::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), scenarios.len());
        assert_eq!(scenarios[0].config(), &config);
    }
}
