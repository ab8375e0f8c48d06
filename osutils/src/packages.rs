//! Queries and installs system packages through rpm and zypper.

use std::{collections::BTreeSet, process::Command};

use anyhow::{bail, Context, Error};
use duct::cmd;
use log::info;

use crate::exe::RunAndCheck;

const RPM_BIN: &str = "rpm";
const ZYPPER_BIN: &str = "zypper";

/// Returns whether the tools to query and install packages are present.
pub fn is_available() -> bool {
    which::which(RPM_BIN).is_ok() && which::which(ZYPPER_BIN).is_ok()
}

/// Returns whether the given package is installed.
pub fn is_installed(package: &str) -> Result<bool, Error> {
    Ok(cmd!(RPM_BIN, "-q", "--quiet", package)
        .unchecked()
        .stdout_null()
        .stderr_null()
        .run()
        .with_context(|| format!("Failed to query package '{package}'"))?
        .status
        .success())
}

/// Returns the packages of the set that are not installed, in order.
pub fn missing_packages(packages: &BTreeSet<String>) -> Result<Vec<String>, Error> {
    let mut missing = Vec::new();
    for package in packages {
        if !is_installed(package)? {
            missing.push(package.clone());
        }
    }
    Ok(missing)
}

fn install_command(packages: &[String]) -> Command {
    let mut command = Command::new(ZYPPER_BIN);
    command
        .arg("--non-interactive")
        .arg("install")
        .arg("--no-recommends")
        .args(packages);
    command
}

/// Installs the given packages without asking.
pub fn install(packages: &[String]) -> Result<(), Error> {
    if packages.is_empty() {
        return Ok(());
    }

    if !is_available() {
        bail!("Cannot install packages, '{ZYPPER_BIN}' is not available");
    }

    info!("Installing packages: {}", packages.join(", "));
    install_command(packages)
        .run_and_check()
        .context("Failed to install packages")
}
