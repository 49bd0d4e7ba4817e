//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Avatar, favicon and decorative QR synthesis service
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: avatar.toml)
    #[arg(short = 'C', long, global = true, default_value = "avatar.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP service
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Number of request handler threads
        #[arg(short, long)]
        workers: Option<usize>,
    },

    /// Render one avatar configuration to disk
    #[command(visible_alias = "r")]
    Render {
        /// JSON file holding an avatar configuration (bare or as `{"config": ...}`)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,

        /// Output file. Favicon sets write `<stem>-<size>.svg` next to it.
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_and_verbose_flags() {
        let cli = Cli::parse_from(["avatar-forge", "-v", "serve"]);
        assert!(cli.verbose);
        let err = Cli::try_parse_from(["avatar-forge", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from(["avatar-forge", "serve", "-p", "8080", "-w", "2", "--verbose"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Serve {
                interface,
                port,
                workers,
            } => {
                assert_eq!(interface, None);
                assert_eq!(port, Some(8080));
                assert_eq!(workers, Some(2));
            }
            Commands::Render { .. } => unreachable!(),
        }
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::parse_from(["avatar-forge", "-C", "x.toml", "render", "in.json", "-o", "out.png"]);
        assert_eq!(cli.config, PathBuf::from("x.toml"));
        match cli.command {
            Commands::Render { input, output } => {
                assert_eq!(input, PathBuf::from("in.json"));
                assert_eq!(output, Some(PathBuf::from("out.png")));
            }
            Commands::Serve { .. } => unreachable!(),
        }
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::parse_from(["avatar-forge", "serve"]);
        assert_eq!(cli.config, PathBuf::from("avatar.toml"));
    }
}
