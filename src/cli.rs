use std::path::PathBuf;

use clap::{
    ArgAction,
    Args,
    Parser,
    Subcommand,
};

/// Top-level CLI entry point.
#[derive(Debug, Parser)]
#[command(
    name = "koyomi",
    version,
    about = "Register events from photographed paper calendars"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Configuration file. Defaults to `config.hjson` in the data directory.
    #[arg(global = true, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Increase logging verbosity (-v, -vv).
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the configured grid as JSON.
    Grid,
    /// OCR a calendar photo and print the populated cells.
    Map(ImageArgs),
    /// OCR a calendar photo and register one all-day event per filled cell.
    Import(ImageArgs),
    /// OCR a flyer or note and register a single timed event.
    Text(ImageArgs),
    /// Run date/time extraction on literal text, offline.
    Extract(ExtractArgs),
}

#[derive(Debug, Args)]
pub struct ImageArgs {
    /// JPEG, PNG or WebP image.
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    #[arg(value_name = "TEXT")]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_flag_works_after_subcommand() {
        let cli = Cli::try_parse_from(["koyomi", "grid", "--config", "/tmp/k.hjson", "-vv"]).unwrap();
        assert!(matches!(cli.command, Commands::Grid));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/k.hjson")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn image_commands_require_a_path() {
        assert!(Cli::try_parse_from(["koyomi", "import"]).is_err());
        let cli = Cli::try_parse_from(["koyomi", "map", "fridge.jpg"]).unwrap();
        match cli.command {
            Commands::Map(args) => assert_eq!(args.image, PathBuf::from("fridge.jpg")),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
