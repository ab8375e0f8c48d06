use std::process::ExitCode;

use clap::Parser;
use log::{error, info, LevelFilter};

use partitioner::{
    cli::Cli,
    commands::{self, ExitKind},
    config::ConfigFile,
    prompt::TerminalPrompt,
    JsonFileLog, MultiLogger, PARTITIONER_VERSION,
};
use partitioner_api::error::{
    InitializationError, InvalidInputError, PartitionerError, PartitionerResultExt, ReportError,
};

fn setup_logging(args: &Cli) -> Result<(), PartitionerError> {
    let mut multilogger = MultiLogger::new()
        // Add regular env_logger to output to stderr
        .with_logger(Box::new(
            env_logger::builder()
                .format_timestamp(None)
                .filter_level(args.verbosity)
                .build(),
        ))
        // Edges of the device graph are too noisy even for trace logs
        .with_target_filter("partitioner_api::devicegraph::builder", LevelFilter::Debug);

    if let Some(path) = &args.log_file {
        // The log file gets everything
        multilogger.add_logger(
            JsonFileLog::create(path)
                .structured(InitializationError::Logger)
                .message("Failed to create the log file")?
                .into_logger(),
        );
    } else {
        multilogger = multilogger.with_max_level(args.verbosity);
    }

    multilogger
        .init()
        .structured(InitializationError::Logger)
        .message("Logger already registered")
}

fn load_config(args: &Cli) -> Result<ConfigFile, PartitionerError> {
    match &args.config {
        Some(path) => ConfigFile::load(path).structured(InvalidInputError::LoadConfiguration {
            path: path.to_string_lossy().to_string(),
        }),
        None => Ok(ConfigFile::default()),
    }
}

fn run_partitioner(args: &Cli) -> Result<ExitKind, PartitionerError> {
    info!("Partitioner version: {PARTITIONER_VERSION}");

    let config = load_config(args)?;
    let prompt = TerminalPrompt::new(config.prompt);
    commands::execute(&args.command, &config, &prompt)
        .message(format!("Failed to execute '{}' command", args.command))
}

fn main() -> ExitCode {
    let args = Cli::parse();

    if let Err(e) = setup_logging(&args) {
        eprintln!("Failed to initialize logging: {e:?}");
        return ExitCode::from(2);
    }

    let code = match run_partitioner(&args) {
        Ok(ExitKind::Done) => ExitCode::SUCCESS,
        Ok(ExitKind::Rejected) => {
            info!("Storage setup rejected");
            ExitCode::from(1)
        }
        Err(e) => {
            error!("Partitioner failed with {} error: {e:?}", e.category());
            ExitCode::from(2)
        }
    };
    log::logger().flush();
    code
}
