use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidvault")]
#[command(author, version, about = "Obfuscated video store maintenance tool")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which videos a bulk command touches.
#[derive(Args)]
pub struct Targets {
    /// Process every video
    #[arg(short, long, conflicts_with = "ids")]
    pub all: bool,

    /// Video IDs to process
    #[arg(required_unless_present = "all")]
    pub ids: Vec<u64>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Regenerate thumbnails
    Thumbnail(Targets),

    /// Transcode videos one by one
    Transcode(Targets),

    /// Copy every record of a JSON document into the configured repository
    MigrateJson {
        /// JSON document path inside storage (defaults to repository.json_file)
        #[arg(long)]
        from: Option<String>,
    },

    /// Decode a stored file into a plain local file
    Decode {
        /// Path inside storage
        path: String,

        /// Local output file
        out: PathBuf,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_takes_ids() {
        let cli = Cli::try_parse_from(["vidvault", "thumbnail", "3", "5"]).unwrap();
        match cli.command {
            Commands::Thumbnail(t) => {
                assert!(!t.all);
                assert_eq!(t.ids, vec![3, 5]);
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn transcode_all() {
        let cli = Cli::try_parse_from(["vidvault", "-v", "transcode", "-a"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Transcode(Targets { all: true, .. })));
    }

    #[test]
    fn bulk_needs_a_target() {
        assert!(Cli::try_parse_from(["vidvault", "thumbnail"]).is_err());
        assert!(Cli::try_parse_from(["vidvault", "thumbnail", "-a", "1"]).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
