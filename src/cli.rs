use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::PARTITIONER_VERSION;

#[derive(Parser, Debug)]
#[clap(version = PARTITIONER_VERSION)]
pub struct Cli {
    /// Logging verbosity [OFF, ERROR, WARN, INFO, DEBUG, TRACE]
    #[arg(global = true, short, long, default_value_t = LevelFilter::Warn)]
    pub verbosity: LevelFilter,

    /// Path to the configuration file
    #[arg(global = true, short, long)]
    pub config: Option<PathBuf>,

    /// Also write all logs as JSON lines into this file
    #[arg(global = true, long)]
    pub log_file: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the page tree of the partitioner overview
    Pages {
        /// Device graph description
        #[clap(index = 1)]
        graph: PathBuf,
    },

    /// Print the page representing a device
    Find {
        /// Device graph description
        #[clap(index = 1)]
        graph: PathBuf,

        /// Name of the device, e.g. /dev/sda
        #[clap(index = 2)]
        device: String,
    },

    /// Check whether the storage setup can be used
    Validate {
        /// Device graph description
        #[clap(index = 1)]
        graph: PathBuf,
    },
}

impl Display for Commands {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Commands::Pages { .. } => write!(f, "pages"),
            Commands::Find { .. } => write!(f, "find"),
            Commands::Validate { .. } => write!(f, "validate"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse() {
        let cli = Cli::try_parse_from([
            "partitioner",
            "find",
            "graph.yaml",
            "/dev/sda",
            "--verbosity",
            "trace",
            "--config",
            "partitioner.yaml",
        ])
        .unwrap();

        assert_eq!(cli.verbosity, LevelFilter::Trace);
        assert_eq!(cli.config, Some(PathBuf::from("partitioner.yaml")));
        assert_eq!(cli.log_file, None);
        assert_eq!(cli.command.to_string(), "find");
        match cli.command {
            Commands::Find { graph, device } => {
                assert_eq!(graph, PathBuf::from("graph.yaml"));
                assert_eq!(device, "/dev/sda");
            }
            other => panic!("Unexpected command: {other:?}"),
        }

        Cli::try_parse_from(["partitioner", "validate"]).unwrap_err();
    }
}
