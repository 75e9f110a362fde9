//! CLI structure and command definitions.

use crate::commands::{check, provision};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use seedling_core::config::process_env;
use seedling_core::ProvisionConfig;
use seedling_types::LogLevel;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "seedling")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate the secrets an installation needs, never overwriting existing ones", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the secrets (default: ./secrets)
    #[arg(long, global = true, value_name = "DIR")]
    pub secrets_dir: Option<PathBuf>,

    /// Configuration file (default: ./seedling.yml if present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output; repeat for more
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Generate every missing secret (the default)
    Provision,

    /// Report on existing secrets without changing anything
    Check {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn execute(&self) -> Result<()> {
        let settings = self.settings()?;
        seedling_core::log::init(settings.log_level)?;
        tracing::debug!("Using secrets directory {:?}", settings.secrets_dir);

        match &self.command {
            None | Some(Commands::Provision) => provision::execute(&settings),
            Some(Commands::Check { json }) => check::execute(&settings, *json),
        }
    }

    /// Resolve settings from file and environment, then apply flags.
    pub fn settings(&self) -> Result<ProvisionConfig> {
        let mut settings = ProvisionConfig::load(self.config.as_deref(), process_env())
            .context("Failed to load configuration")?;

        if let Some(dir) = &self.secrets_dir {
            settings.secrets_dir = seedling_core::util::expand_path(dir);
        }
        settings.log_level = self.log_level(settings.log_level);

        Ok(settings)
    }

    fn log_level(&self, configured: LogLevel) -> LogLevel {
        if self.quiet {
            return LogLevel::Warn;
        }
        (0..self.verbose).fold(configured, |level, _| level.louder())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_provisions() {
        let cli = Cli::try_parse_from(["seedling"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(cli.secrets_dir, None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["seedling", "check", "--json", "--secrets-dir", "/srv/secrets"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Check { json: true }));
        assert_eq!(cli.secrets_dir, Some(PathBuf::from("/srv/secrets")));
    }

    #[test]
    fn test_log_level_flags() {
        let cli = Cli::try_parse_from(["seedling", "-v"]).unwrap();
        assert_eq!(cli.log_level(LogLevel::Info), LogLevel::Debug);

        let cli = Cli::try_parse_from(["seedling", "-vv"]).unwrap();
        assert_eq!(cli.log_level(LogLevel::Info), LogLevel::Trace);

        let cli = Cli::try_parse_from(["seedling", "-q"]).unwrap();
        assert_eq!(cli.log_level(LogLevel::Debug), LogLevel::Warn);

        assert!(Cli::try_parse_from(["seedling", "-q", "-v"]).is_err());
    }
}
