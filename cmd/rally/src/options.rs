//! Match options shared by `play` and `trace`.
//!
//! Values are layered: explicit flags win over the config file, and anything
//! still missing is prompted for on the terminal.

use anyhow::{Context, Result};
use clap::Args;
use rally_engine::config::{validate_bias, validate_name, validate_sets};
use rally_engine::MatchConfig;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Prompt attempts before giving up.
const MAX_ATTEMPTS: usize = 10;

const INVALID_INPUT: &str = "Invalid input. Please try again.";

/// Input problems that end the program with a fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abort {
    /// A flag value failed validation.
    InvalidFlag,
    /// Input ended while prompting.
    NoInput,
    /// Every prompt attempt was invalid.
    TooManyAttempts,
}

impl Abort {
    /// Process exit status for this abort.
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::InvalidFlag => 2,
            Self::NoInput | Self::TooManyAttempts => 1,
        }
    }
}

impl fmt::Display for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFlag => f.write_str(INVALID_INPUT),
            Self::NoInput => f.write_str("Error: no input provided."),
            Self::TooManyAttempts => f.write_str("Multiple invalid attempts. Exiting."),
        }
    }
}

impl std::error::Error for Abort {}

/// Line-based prompts with a retry budget.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<W: Write> Prompter<io::StdinLock<'static>, W> {
    /// Prompts on `output`, reading answers from stdin.
    pub fn stdin(output: W) -> Self {
        Self::new(io::stdin().lock(), output)
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Creates a prompter over arbitrary streams.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks until `parse` accepts the trimmed answer.
    ///
    /// # Errors
    ///
    /// Returns [`Abort::NoInput`] at end of input, [`Abort::TooManyAttempts`]
    /// once the budget is spent, or the underlying I/O error.
    pub fn ask<T>(&mut self, prompt: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
        for _ in 0..MAX_ATTEMPTS {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(Abort::NoInput.into());
            }
            if let Some(value) = parse(line.trim()) {
                return Ok(value);
            }
            writeln!(self.output, "{INVALID_INPUT}")?;
        }
        Err(Abort::TooManyAttempts.into())
    }
}

fn parse_name(raw: &str) -> Option<String> {
    validate_name(raw).ok()
}

fn parse_sets(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok().and_then(|sets| validate_sets(sets).ok())
}

fn parse_bias(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok().and_then(|bias| validate_bias(bias).ok())
}

/// Partial match configuration read from `--config`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    player_a: Option<String>,
    player_b: Option<String>,
    max_sets: Option<u32>,
    starting_bias: Option<i64>,
    seed: Option<u64>,
    point_delta: Option<i32>,
    game_delta: Option<i32>,
    set_delta: Option<i32>,
}

impl ConfigFile {
    /// Reads a YAML file, or JSON when the extension is `.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        Self::parse(&content, is_json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(content: &str, is_json: bool) -> Result<Self> {
        if is_json {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(serde_yaml::from_str(content)?)
        }
    }
}

/// Match options for `play` and `trace`.
#[derive(Debug, Clone, Default, Args)]
pub struct MatchArgs {
    /// Player A name
    #[arg(long)]
    pub player_a: Option<String>,

    /// Player B name
    #[arg(long)]
    pub player_b: Option<String>,

    /// Number of sets (3 or 5)
    #[arg(long)]
    pub sets: Option<u32>,

    /// Starting bias toward player B (0..100)
    #[arg(long, allow_hyphen_values = true)]
    pub bias: Option<i64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Bias change per point toward the winner [default: 1]
    #[arg(long, allow_hyphen_values = true)]
    pub point_delta: Option<i32>,

    /// Bias change per game toward the winner [default: 2]
    #[arg(long, allow_hyphen_values = true)]
    pub game_delta: Option<i32>,

    /// Bias change per set toward the winner [default: 5]
    #[arg(long, allow_hyphen_values = true)]
    pub set_delta: Option<i32>,

    /// Match config file (YAML, or JSON with a .json extension)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Takes the flag, then the file value, then the prompt.
fn layer<V, T>(
    flag: Option<V>,
    file: Option<V>,
    field: &str,
    validate: impl Fn(V) -> rally_engine::Result<T>,
    prompt: impl FnOnce() -> Result<T>,
) -> Result<T> {
    if let Some(value) = flag {
        return validate(value).map_err(|_| Abort::InvalidFlag.into());
    }
    if let Some(value) = file {
        return validate(value).with_context(|| format!("Invalid {field} in config file"));
    }
    prompt()
}

impl MatchArgs {
    /// Builds a validated configuration, prompting for missing values.
    ///
    /// # Errors
    ///
    /// Returns [`Abort`] for bad flags or prompts, or a config file error.
    pub fn resolve<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<MatchConfig> {
        let file = match &self.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        self.merge(file, prompter)
    }

    fn merge<R: BufRead, W: Write>(
        &self,
        file: ConfigFile,
        prompter: &mut Prompter<R, W>,
    ) -> Result<MatchConfig> {
        let player_a = layer(
            self.player_a.clone(),
            file.player_a,
            "player_a",
            |name: String| validate_name(&name),
            || prompter.ask("Player A name: ", parse_name),
        )?;
        let player_b = layer(
            self.player_b.clone(),
            file.player_b,
            "player_b",
            |name: String| validate_name(&name),
            || prompter.ask("Player B name: ", parse_name),
        )?;
        let max_sets = layer(self.sets, file.max_sets, "max_sets", validate_sets, || {
            prompter.ask("Number of sets (3 or 5): ", parse_sets)
        })?;
        let starting_bias = layer(
            self.bias,
            file.starting_bias,
            "starting_bias",
            validate_bias,
            || prompter.ask("Starting bias (0..100): ", parse_bias),
        )?;

        let mut config = MatchConfig::new(player_a, player_b, max_sets, starting_bias);
        config.point_delta = self.point_delta.or(file.point_delta).unwrap_or(config.point_delta);
        config.game_delta = self.game_delta.or(file.game_delta).unwrap_or(config.game_delta);
        config.set_delta = self.set_delta.or(file.set_delta).unwrap_or(config.set_delta);
        config.seed = self.seed.or(file.seed);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn abort_of(err: &anyhow::Error) -> Option<Abort> {
        err.downcast_ref::<Abort>().copied()
    }

    #[test]
    fn prompts_for_missing_values() {
        let mut prompter = prompter("Ann\n  Bo Lee \n4\n5\n101\n60\n");
        let config = MatchArgs::default().resolve(&mut prompter).unwrap();

        assert_eq!(config.player_a, "Ann");
        assert_eq!(config.player_b, "Bo Lee");
        assert_eq!(config.max_sets, 5);
        assert_eq!(config.starting_bias, 60);
        assert_eq!(config.seed, None);
        assert_eq!((config.point_delta, config.game_delta, config.set_delta), (1, 2, 5));

        let shown = String::from_utf8(prompter.output).unwrap();
        assert_eq!(shown.matches(INVALID_INPUT).count(), 2);
        assert!(shown.starts_with("Player A name: Player B name: "));
    }

    #[test]
    fn end_of_input_aborts() {
        let err = MatchArgs::default().resolve(&mut prompter("Ann\n")).unwrap_err();
        assert_eq!(abort_of(&err), Some(Abort::NoInput));
    }

    #[test]
    fn retry_budget_is_ten_attempts() {
        let answers = "x1\n".repeat(10);
        let err = MatchArgs::default().resolve(&mut prompter(&answers)).unwrap_err();
        assert_eq!(abort_of(&err), Some(Abort::TooManyAttempts));

        let answers = format!("{}Ann\n", "x1\n".repeat(9));
        let mut prompter = prompter(&answers);
        assert_eq!(prompter.ask("? ", parse_name).unwrap(), "Ann");
    }

    #[test]
    fn numeric_prompts_require_plain_digits() {
        assert_eq!(parse_sets("3"), Some(3));
        assert_eq!(parse_sets("+3"), None);
        assert_eq!(parse_sets("4"), None);
        assert_eq!(parse_bias("0"), Some(0));
        assert_eq!(parse_bias("-1"), None);
        assert_eq!(parse_bias("99999999999999999999"), None);
    }

    #[test]
    fn invalid_flag_exits_with_status_two() {
        let args = MatchArgs {
            player_a: Some("R2D2".to_string()),
            ..MatchArgs::default()
        };
        let err = args.resolve(&mut prompter("")).unwrap_err();
        let abort = abort_of(&err).unwrap();
        assert_eq!(abort, Abort::InvalidFlag);
        assert_eq!(abort.exit_code(), 2);
        assert_eq!(abort.to_string(), INVALID_INPUT);
    }

    #[test]
    fn flags_override_config_file() {
        let file = ConfigFile::parse(
            "player_a: Ann\nplayer_b: Bo\nmax_sets: 3\nstarting_bias: 40\nseed: 7\ngame_delta: 0\n",
            false,
        )
        .unwrap();
        let args = MatchArgs {
            bias: Some(70),
            seed: Some(9),
            ..MatchArgs::default()
        };
        let config = args.merge(file, &mut prompter("")).unwrap();

        assert_eq!(config.player_a, "Ann");
        assert_eq!(config.starting_bias, 70);
        assert_eq!(config.seed, Some(9));
        assert_eq!((config.point_delta, config.game_delta, config.set_delta), (1, 0, 5));
    }

    #[test]
    fn json_config_and_bad_file_values() {
        let file = ConfigFile::parse(r#"{"player_a": "Ann", "max_sets": 4}"#, true).unwrap();
        let err = MatchArgs::default()
            .merge(file, &mut prompter("Bo\n"))
            .unwrap_err();
        assert_eq!(abort_of(&err), None);
        assert!(err.to_string().contains("max_sets"), "{err}");

        assert!(ConfigFile::parse("colour: red\n", false).is_err());
    }
}
