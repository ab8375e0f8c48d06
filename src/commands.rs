use std::path::Path;

use log::info;

use partitioner_api::{
    devicegraph::{error::DeviceGraphBuildError, DeviceGraph, SetupChecker},
    error::{InvalidInputError, PartitionerError, PartitionerResultExt, ReportError},
};

use crate::{
    cli::Commands,
    collaborators::{DescriptionFile, DeviceGraphProvider, PackageSystem, UsedFeatures, UserPrompt},
    config::ConfigFile,
    pager::{find_page, PageTreeBuilder},
    validation::SetupValidator,
};

/// Text printed by `find` for devices without a page.
pub const NO_PAGE: &str = "no page";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    Done,

    /// The storage setup was rejected.
    Rejected,
}

fn load_graph(path: &Path) -> Result<DeviceGraph, PartitionerError> {
    DescriptionFile::new(path)
        .current_graph()
        .or_else(|e| match e.downcast::<DeviceGraphBuildError>() {
            Ok(build_error) => Err(PartitionerError::new(InvalidInputError::from(build_error)))
                .message(format!("Loading '{}'", path.display())),
            Err(e) => Err::<DeviceGraph, _>(e).structured(InvalidInputError::LoadDeviceGraph {
                path: path.to_string_lossy().to_string(),
            }),
        })
}

/// Renders the page tree of the graph.
pub fn pages(graph: &DeviceGraph, config: &ConfigFile) -> String {
    PageTreeBuilder::new(graph, config)
        .with_system_label(config.system_label())
        .build()
        .to_string()
}

/// Returns the id of the page representing the named device.
pub fn find(graph: &DeviceGraph, config: &ConfigFile, device_name: &str) -> String {
    let Some(device) = graph.device_by_name(device_name) else {
        info!("Device '{device_name}' is not part of the device graph");
        return NO_PAGE.into();
    };

    let tree = PageTreeBuilder::new(graph, config).build();
    find_page(&tree, device)
        .map(|page| page.id.clone())
        .unwrap_or_else(|| NO_PAGE.into())
}

/// Runs the setup validation.
pub fn validate(graph: &DeviceGraph, config: &ConfigFile, prompt: &dyn UserPrompt) -> bool {
    let checker = SetupChecker::new(config.min_root_size);
    let installer = PackageSystem::new(config.package_manager, prompt);
    SetupValidator::new(&checker, &UsedFeatures, &installer, prompt, config).validate(graph)
}

/// Executes a command of the command line tool.
pub fn execute(
    command: &Commands,
    config: &ConfigFile,
    prompt: &dyn UserPrompt,
) -> Result<ExitKind, PartitionerError> {
    match command {
        Commands::Pages { graph } => {
            print!("{}", pages(&load_graph(graph)?, config));
        }
        Commands::Find { graph, device } => {
            println!("{}", find(&load_graph(graph)?, config, device));
        }
        Commands::Validate { graph } => {
            if !validate(&load_graph(graph)?, config, prompt) {
                return Ok(ExitKind::Rejected);
            }
        }
    }
    Ok(ExitKind::Done)
}
