//! Command definitions for the TinyTimer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{AnimationOption, MusicOption, TimerConfig, MAX_MINUTES, MAX_SECONDS};

// ============================================================================
// CLI Structure
// ============================================================================

/// TinyTimer - a small countdown timer with a celebration at the end
#[derive(Parser, Debug)]
#[command(
    name = "tinytimer",
    version,
    about = "お祝い付きのシンプルなカウントダウンタイマー",
    long_about = "ターミナル上で動作するカウントダウンタイマー。\n\
                  時間になると通知し、音楽とキャラクターでお祝いします。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive countdown
    Run(RunArgs),

    /// List completion music and characters
    Themes,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Minutes (0-60)
    #[arg(
        short,
        long,
        default_value = "1",
        value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_MINUTES))
    )]
    pub minutes: u32,

    /// Seconds (0-59)
    #[arg(
        short,
        long,
        default_value = "0",
        value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_SECONDS))
    )]
    pub seconds: u32,

    /// Completion music (storm-dance, chill-happy, we-made-it)
    #[arg(long, default_value = "storm-dance")]
    pub music: MusicOption,

    /// Character (alpaca, dino, pig)
    #[arg(short, long, default_value = "dino")]
    pub animation: AnimationOption,

    /// Disable all sounds
    #[arg(long)]
    pub no_sound: bool,

    /// Disable the completion notification
    #[arg(long)]
    pub no_notify: bool,

    /// Disable the live status line
    #[arg(long)]
    pub no_live: bool,

    /// Directory with custom sound files (<music-id>.mp3 etc.)
    #[arg(long, value_name = "DIR", value_parser = validate_sounds_dir)]
    pub sounds_dir: Option<PathBuf>,

    /// Print the final state as JSON on exit
    #[arg(long)]
    pub json: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            minutes: 1,
            seconds: 0,
            music: MusicOption::default(),
            animation: AnimationOption::default(),
            no_sound: false,
            no_notify: false,
            no_live: false,
            sounds_dir: None,
            json: false,
        }
    }
}

impl RunArgs {
    /// Builds the timer configuration from the arguments.
    #[must_use]
    pub fn to_config(&self) -> TimerConfig {
        TimerConfig::new(self.minutes, self.seconds)
            .with_music(self.music)
            .with_animation(self.animation)
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the sounds directory.
///
/// - Must not be empty
/// - Must be an existing directory
fn validate_sounds_dir(s: &str) -> Result<PathBuf, String> {
    if s.is_empty() {
        return Err("サウンドディレクトリは空にできません".to_string());
    }
    let path = PathBuf::from(s);
    if !path.is_dir() {
        return Err(format!("ディレクトリが見つかりません: {}", s));
    }
    Ok(path)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["tinytimer"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_parse_short_verbose_flag() {
            let cli = Cli::parse_from(["tinytimer", "-v", "themes"]);
            assert!(cli.verbose);
            assert!(matches!(cli.command, Some(Commands::Themes)));
        }

        #[test]
        fn test_parse_completions_zsh() {
            let cli = Cli::parse_from(["tinytimer", "completions", "zsh"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Zsh);
                }
                _ => panic!("Expected Completions command"),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Run Command Tests
    // ------------------------------------------------------------------------

    mod run_args_tests {
        use super::*;

        fn parse_run(args: &[&str]) -> RunArgs {
            let mut argv = vec!["tinytimer", "run"];
            argv.extend_from_slice(args);
            match Cli::parse_from(argv).command {
                Some(Commands::Run(args)) => args,
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_parse_run_defaults() {
            let args = parse_run(&[]);
            assert_eq!(args.minutes, 1);
            assert_eq!(args.seconds, 0);
            assert_eq!(args.music, MusicOption::StormDance);
            assert_eq!(args.animation, AnimationOption::Dino);
            assert!(!args.no_sound);
            assert!(!args.no_notify);
            assert!(!args.no_live);
            assert!(args.sounds_dir.is_none());
            assert!(!args.json);
        }

        #[test]
        fn test_parse_run_duration() {
            let args = parse_run(&["-m", "2", "-s", "30"]);
            assert_eq!(args.to_config().total_seconds(), 150);
        }

        #[test]
        fn test_parse_run_theme() {
            let args = parse_run(&["--music", "we-made-it", "--animation", "pig"]);
            let config = args.to_config();
            assert_eq!(config.music, MusicOption::WeMadeIt);
            assert_eq!(config.animation, AnimationOption::Pig);
        }

        #[test]
        fn test_parse_run_flags() {
            let args = parse_run(&["--no-sound", "--no-notify", "--no-live", "--json"]);
            assert!(args.no_sound);
            assert!(args.no_notify);
            assert!(args.no_live);
            assert!(args.json);
        }

        #[test]
        fn test_parse_run_sounds_dir() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().to_str().unwrap();
            let args = parse_run(&["--sounds-dir", path]);
            assert_eq!(args.sounds_dir.as_deref(), Some(dir.path()));
        }

        #[test]
        fn test_minutes_out_of_range() {
            let result = Cli::try_parse_from(["tinytimer", "run", "--minutes", "61"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_seconds_out_of_range() {
            let result = Cli::try_parse_from(["tinytimer", "run", "--seconds", "60"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_unknown_music() {
            let result = Cli::try_parse_from(["tinytimer", "run", "--music", "polka"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_missing_sounds_dir() {
            let result = Cli::try_parse_from([
                "tinytimer",
                "run",
                "--sounds-dir",
                "/definitely/not/here",
            ]);
            assert!(result.is_err());
        }

        #[test]
        fn test_default_matches_parsed_defaults() {
            let defaults = RunArgs::default();
            let parsed = parse_run(&[]);
            assert_eq!(defaults.to_config(), parsed.to_config());
        }
    }

    // ------------------------------------------------------------------------
    // Validation Tests
    // ------------------------------------------------------------------------

    mod validation_tests {
        use super::*;

        #[test]
        fn test_validate_sounds_dir_empty() {
            assert!(validate_sounds_dir("").is_err());
        }
    }
}
