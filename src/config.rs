use std::path::Path;

use anyhow::{Context, Error};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use osutils::host;
use partitioner_api::constants::DEFAULT_MIN_ROOT_SIZE;

use crate::collaborators::EnvironmentFlags;

/// Definition of the partitioner's configuration file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    /// Label of the system page. Defaults to the hostname of the machine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Whether the graphical device graph view is available.
    #[serde(default)]
    pub graphical: Graphical,

    /// The mode to run in.
    #[serde(default)]
    pub mode: Mode,

    /// How questions to the user are answered.
    #[serde(default)]
    pub prompt: PromptMode,

    /// Tool used to install the packages required by the storage setup.
    #[serde(default)]
    pub package_manager: PackageManager,

    /// Root filesystems smaller than this, in bytes, are reported.
    #[serde(default = "default_min_root_size")]
    pub min_root_size: u64,
}

fn default_min_root_size() -> u64 {
    DEFAULT_MIN_ROOT_SIZE
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Graphical {
    /// Available when a display server is reachable.
    #[default]
    Auto,
    Enabled,
    Disabled,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Working on an installed system.
    #[default]
    Normal,

    /// Running as part of the first installation of the system. Packages are
    /// handled by the installer.
    Installation,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PromptMode {
    /// Ask interactively on the terminal.
    #[default]
    Ask,
    AssumeYes,
    AssumeNo,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PackageManager {
    #[default]
    Zypper,

    /// Never install anything; required packages are only reported.
    None,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            hostname: None,
            graphical: Graphical::default(),
            mode: Mode::default(),
            prompt: PromptMode::default(),
            package_manager: PackageManager::default(),
            min_root_size: DEFAULT_MIN_ROOT_SIZE,
        }
    }
}

impl ConfigFile {
    pub fn from_yaml(contents: &str) -> Result<Self, Error> {
        serde_yaml::from_str(contents).context("Failed to parse configuration")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        debug!("Loading configuration from '{}'", path.as_ref().display());
        let contents = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read configuration file '{}'",
                path.as_ref().display()
            )
        })?;
        Self::from_yaml(&contents)
    }

    /// Returns the label of the system page.
    pub fn system_label(&self) -> String {
        if let Some(hostname) = &self.hostname {
            return hostname.clone();
        }

        host::hostname().unwrap_or_else(|e| {
            warn!("Failed to determine the hostname: {e:?}");
            "localhost".into()
        })
    }
}

impl EnvironmentFlags for ConfigFile {
    fn supports_graphical_view(&self) -> bool {
        match self.graphical {
            Graphical::Auto => host::has_graphical_display(),
            Graphical::Enabled => true,
            Graphical::Disabled => false,
        }
    }

    fn is_first_installation(&self) -> bool {
        self.mode == Mode::Installation
    }
}
