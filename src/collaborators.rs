//! Narrow interfaces to everything the pager and the setup validator consume,
//! together with the implementations used by the command line tool.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, Error};
use log::{debug, info, warn};

use partitioner_api::devicegraph::{
    CheckReport, DeviceGraph, DeviceGraphDescription, SetupChecker, UsedStorageFeatures,
};

use crate::{config::PackageManager, validation::presenter};

/// Answer of the user to a yes/no question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Accept,
    Decline,
}

pub trait DeviceGraphProvider {
    /// Returns a snapshot of the current devices.
    fn current_graph(&self) -> Result<DeviceGraph, Error>;
}

pub trait CorrectnessChecker {
    fn check(&self, graph: &DeviceGraph) -> Result<CheckReport, Error>;
}

pub trait FeaturePackageResolver {
    /// Returns the packages needed by the storage features used in the graph.
    fn required_packages(&self, graph: &DeviceGraph) -> Result<BTreeSet<String>, Error>;
}

pub trait PackageInstaller {
    /// Makes sure all packages are installed. Returns whether they are.
    fn ensure_installed(&self, packages: &BTreeSet<String>) -> Result<bool, Error>;
}

pub trait UserPrompt {
    /// Asks a yes/no question.
    fn confirm(&self, message: &str) -> Result<Answer, Error>;

    /// Shows a message the user can only acknowledge.
    fn notify(&self, message: &str) -> Result<(), Error>;
}

pub trait EnvironmentFlags {
    fn supports_graphical_view(&self) -> bool;

    /// Whether this is the first installation of the system, where packages
    /// are taken care of by the installer.
    fn is_first_installation(&self) -> bool;
}

/// Reads the device graph from a YAML description on every request.
#[derive(Debug, Clone)]
pub struct DescriptionFile {
    path: PathBuf,
}

impl DescriptionFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }
}

impl DeviceGraphProvider for DescriptionFile {
    fn current_graph(&self) -> Result<DeviceGraph, Error> {
        debug!("Reading device graph from '{}'", self.path.display());
        DeviceGraphDescription::load(&self.path)?
            .build()
            .with_context(|| format!("Invalid device graph in '{}'", self.path.display()))
    }
}

impl CorrectnessChecker for SetupChecker {
    fn check(&self, graph: &DeviceGraph) -> Result<CheckReport, Error> {
        Ok(SetupChecker::check(self, graph))
    }
}

/// Resolves packages from the storage features in use.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsedFeatures;

impl FeaturePackageResolver for UsedFeatures {
    fn required_packages(&self, graph: &DeviceGraph) -> Result<BTreeSet<String>, Error> {
        Ok(UsedStorageFeatures::new(graph).feature_packages())
    }
}

/// Access to the package database of the system.
pub trait PackageBackend {
    /// Returns the packages of the set that are not installed.
    fn missing_packages(&self, packages: &BTreeSet<String>) -> Result<Vec<String>, Error>;

    /// Installs the packages without asking.
    fn install(&self, packages: &[String]) -> Result<(), Error>;
}

/// Packages queried with rpm and installed with zypper.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZypperBackend;

impl PackageBackend for ZypperBackend {
    fn missing_packages(&self, packages: &BTreeSet<String>) -> Result<Vec<String>, Error> {
        osutils::packages::missing_packages(packages)
    }

    fn install(&self, packages: &[String]) -> Result<(), Error> {
        osutils::packages::install(packages)
    }
}

/// Installs missing packages with the configured package manager, after the
/// user agreed to it.
pub struct PackageSystem<'a> {
    backend: Option<&'a dyn PackageBackend>,
    prompt: &'a dyn UserPrompt,
}

impl<'a> PackageSystem<'a> {
    pub fn new(manager: PackageManager, prompt: &'a dyn UserPrompt) -> Self {
        let backend: Option<&'a dyn PackageBackend> = match manager {
            PackageManager::Zypper => Some(&ZypperBackend),
            PackageManager::None => None,
        };
        Self { backend, prompt }
    }

    pub fn with_backend(backend: &'a dyn PackageBackend, prompt: &'a dyn UserPrompt) -> Self {
        Self {
            backend: Some(backend),
            prompt,
        }
    }
}

impl PackageInstaller for PackageSystem<'_> {
    fn ensure_installed(&self, packages: &BTreeSet<String>) -> Result<bool, Error> {
        let Some(backend) = self.backend else {
            let list = packages.iter().cloned().collect::<Vec<_>>().join(", ");
            warn!("Package management is disabled, make sure these are installed: {list}");
            return Ok(true);
        };

        let missing = backend
            .missing_packages(packages)
            .context("Failed to query required packages")?;
        if missing.is_empty() {
            debug!("All {} required package(s) are installed", packages.len());
            return Ok(true);
        }

        match self.prompt.confirm(&presenter::install_question(&missing))? {
            Answer::Accept => {}
            Answer::Decline => {
                info!("Installation of {} declined by the user", missing.join(", "));
                return Ok(false);
            }
        }

        backend
            .install(&missing)
            .context("Failed to install required packages")?;

        let still_missing = backend
            .missing_packages(packages)
            .context("Failed to query required packages")?;
        if !still_missing.is_empty() {
            warn!(
                "Packages still missing after installation: {}",
                still_missing.join(", ")
            );
        }
        Ok(still_missing.is_empty())
    }
}
