//! Command-line parsing.

use std::path::PathBuf;

use costcheck_infrastructure::{ConfigError, Settings};

/// Usage text printed for `--help` and after argument errors.
pub const USAGE: &str = "\
Usage: costcheck [OPTIONS]

Probes the Cost Manager REST API, then runs the assertion suite against it.

Options:
  --base-url <URL>     Service root (default http://localhost:3000)
  --prefix <PATH>      Path prefix of every endpoint (default /api)
  --output <PATH>      Probe output file (default probe-output.txt)
  --config <FILE>      TOML settings file
  --report <PATH>      Also write suite results as JSON to PATH
  --format <FORMAT>    Output format on stdout: text or json (default text)
  --user-id <N>        Existing user the checks run as (default 123123)
  --skip-probes        Do not run the raw endpoint probes
  --skip-suite         Do not run the assertion suite
  --all-categories     Add one cost per category instead of only food
  -h, --help           Print this help

Settings can also be given as COSTCHECK_* environment variables,
e.g. COSTCHECK_BASE_URL. Flags take precedence over both.

Exit status: 0 if every check passed, 1 if a check failed,
2 on a usage or configuration error.
";

/// Errors from parsing command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CliError {
    /// A flag that needs a value was last on the line.
    #[error("missing value for {0}")]
    MissingValue(String),

    /// A flag value could not be parsed.
    #[error("invalid value '{value}' for {flag}")]
    InvalidValue {
        /// The flag.
        flag: String,
        /// The rejected value.
        value: String,
    },

    /// An argument no flag matches.
    #[error("unknown argument: {0}")]
    UnknownArgument(String),

    /// Both phases were skipped, leaving nothing to do.
    #[error("--skip-probes and --skip-suite together leave nothing to run")]
    NothingToRun,
}

/// Output format for CLI reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// What the process was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run probes and/or the suite.
    Run(CliConfig),
    /// Print usage and exit.
    Help,
}

/// CLI configuration parsed from command-line arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// `--base-url`
    pub base_url: Option<String>,
    /// `--prefix`
    pub prefix: Option<String>,
    /// `--output`
    pub output: Option<PathBuf>,
    /// `--config`
    pub config_path: Option<PathBuf>,
    /// `--report`
    pub report_path: Option<PathBuf>,
    /// `--format`
    pub output_format: OutputFormat,
    /// `--user-id`
    pub user_id: Option<i64>,
    /// `--skip-probes`
    pub skip_probes: bool,
    /// `--skip-suite`
    pub skip_suite: bool,
    /// `--all-categories`
    pub all_categories: bool,
}

impl CliConfig {
    /// Loads layered settings and applies the flags on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be loaded or end up invalid.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let mut settings = Settings::load(self.config_path.as_deref())?;
        self.apply(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    /// Overrides `settings` with every flag that was given.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(base_url) = &self.base_url {
            settings.base_url.clone_from(base_url);
        }
        if let Some(prefix) = &self.prefix {
            settings.prefix.clone_from(prefix);
        }
        if let Some(output) = &self.output {
            settings.output.clone_from(output);
        }
        if let Some(user_id) = self.user_id {
            settings.test_user_id = user_id;
        }
        if self.all_categories {
            settings.exhaustive_categories = true;
        }
    }
}

/// Parses arguments, excluding the program name.
///
/// Accepts both `--flag value` and `--flag=value`.
///
/// # Errors
///
/// Returns an error on unknown flags, missing or malformed values.
pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut config = CliConfig::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => {
                (flag.to_string(), Some(value.to_string()))
            }
            _ => (arg, None),
        };
        let mut value = || {
            inline
                .clone()
                .or_else(|| args.next())
                .ok_or_else(|| CliError::MissingValue(flag.clone()))
        };

        match flag.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--base-url" => config.base_url = Some(value()?),
            "--prefix" => config.prefix = Some(value()?),
            "--output" => config.output = Some(PathBuf::from(value()?)),
            "--config" => config.config_path = Some(PathBuf::from(value()?)),
            "--report" => config.report_path = Some(PathBuf::from(value()?)),
            "--format" => {
                let raw = value()?;
                config.output_format = match raw.as_str() {
                    "text" => OutputFormat::Text,
                    "json" => OutputFormat::Json,
                    _ => return Err(invalid(&flag, raw)),
                };
            }
            "--user-id" => {
                let raw = value()?;
                config.user_id = Some(raw.parse().map_err(|_| invalid(&flag, raw.clone()))?);
            }
            "--skip-probes" => config.skip_probes = true,
            "--skip-suite" => config.skip_suite = true,
            "--all-categories" => config.all_categories = true,
            _ => return Err(CliError::UnknownArgument(flag)),
        }
    }

    if config.skip_probes && config.skip_suite {
        return Err(CliError::NothingToRun);
    }
    Ok(Command::Run(config))
}

fn invalid(flag: &str, value: String) -> CliError {
    CliError::InvalidValue {
        flag: flag.to_string(),
        value,
    }
}
