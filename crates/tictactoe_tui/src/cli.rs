//! Command-line interface for the terminal game.

use std::path::PathBuf;

use clap::Parser;

/// Two-player tic-tac-toe in the terminal
#[derive(Parser, Debug)]
#[command(name = "tictactoe")]
#[command(about = "Two-player tic-tac-toe in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the settings file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "tictactoe.toml")]
    pub config: PathBuf,

    /// Directory that save and load prompts resolve relative paths against
    #[arg(long)]
    pub save_dir: Option<PathBuf>,

    /// File to write logs to
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Start from a previously saved game
    #[arg(long)]
    pub load: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["tictactoe"]);
        assert_eq!(cli.config, PathBuf::from("tictactoe.toml"));
        assert!(cli.save_dir.is_none());
        assert!(cli.load.is_none());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "tictactoe",
            "--config",
            "custom.toml",
            "--save-dir",
            "/saves",
            "--log-file",
            "game.log",
            "--load",
            "old.json",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.save_dir, Some(PathBuf::from("/saves")));
        assert_eq!(cli.log_file, Some(PathBuf::from("game.log")));
        assert_eq!(cli.load, Some(PathBuf::from("old.json")));
    }
}
