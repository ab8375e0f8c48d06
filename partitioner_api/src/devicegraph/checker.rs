//! # Setup checker
//!
//! Rules evaluated over a whole device graph to decide whether the storage
//! setup is good enough to continue. Each rule produces zero or more findings.
//! Fatal findings block the setup, advisory findings only need the user's
//! consent.
//!
//! The rules are declared roughly in the order they are evaluated.

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MIN_ROOT_SIZE, MIN_RAID_MEMBERS};

use super::{
    classifier::DeviceClassifier,
    device::Device,
    graph::DeviceGraph,
    types::{DeviceKind, DeviceKindFlag},
};

/// Severity of a finding.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    /// The setup cannot be used at all.
    Fatal,

    /// The setup is usable but probably not what the user wants.
    Advisory,
}

/// A problem found in the setup.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Finding {
    pub severity: Severity,
    pub description: String,
}

impl Finding {
    pub fn fatal(description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Fatal,
            description: description.into(),
        }
    }

    pub fn advisory(description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Advisory,
            description: description.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

/// Result of checking a setup.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Whether the setup is fully correct.
    pub valid: bool,

    /// All findings, fatal ones first.
    pub findings: Vec<Finding>,
}

impl CheckReport {
    /// Creates a report out of a list of findings.
    pub fn from_findings(mut findings: Vec<Finding>) -> Self {
        findings.sort_by_key(|finding| finding.severity);
        Self {
            valid: findings.is_empty(),
            findings,
        }
    }

    /// Returns whether any finding is fatal.
    pub fn has_fatal(&self) -> bool {
        self.findings.iter().any(Finding::is_fatal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupChecker {
    /// Root filesystems smaller than this, in bytes, are reported.
    pub min_root_size: u64,
}

impl Default for SetupChecker {
    fn default() -> Self {
        Self {
            min_root_size: DEFAULT_MIN_ROOT_SIZE,
        }
    }
}

impl SetupChecker {
    pub fn new(min_root_size: u64) -> Self {
        Self { min_root_size }
    }

    /// Runs all rules against the graph.
    pub fn check(&self, graph: &DeviceGraph) -> CheckReport {
        debug!("Checking storage setup of {} devices", graph.len());
        let classifier = DeviceClassifier::new(graph);

        let mut findings = Vec::new();
        trace!("Checking root filesystem");
        findings.extend(check_root(graph));
        trace!("Checking mount points");
        findings.extend(check_mount_points(graph));
        trace!("Checking grouped members");
        findings.extend(check_grouped_members(graph, &classifier));
        trace!("Checking swap");
        findings.extend(check_swap(graph));
        trace!("Checking root size");
        findings.extend(check_root_size(graph, self.min_root_size));
        trace!("Checking software RAIDs");
        findings.extend(check_raid_members(graph));

        let report = CheckReport::from_findings(findings);
        debug!(
            "Storage setup check finished with {} finding(s)",
            report.findings.len()
        );
        report
    }
}

/// A filesystem must be mounted at the root mount point.
fn check_root(graph: &DeviceGraph) -> Option<Finding> {
    (!graph.devices().any(|device| device.is_root()))
        .then(|| Finding::fatal("There is no device mounted at '/'"))
}

/// Mount points must be unique.
fn check_mount_points(graph: &DeviceGraph) -> Vec<Finding> {
    let mut users: BTreeMap<PathBuf, Vec<&str>> = BTreeMap::new();
    for device in graph.devices() {
        if let Some(mount_point) = device
            .filesystem
            .as_ref()
            .and_then(|fs| fs.mount_point.clone())
        {
            users.entry(mount_point).or_default().push(&device.name);
        }
    }

    users
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(mount_point, names)| {
            Finding::fatal(format!(
                "Mount point '{}' is used by more than one device: {}",
                mount_point.display(),
                names.join(", ")
            ))
        })
        .collect()
}

/// Grouped members are only reachable through their container, so neither
/// they nor the devices they hold can carry a filesystem.
fn check_grouped_members(graph: &DeviceGraph, classifier: &DeviceClassifier) -> Vec<Finding> {
    graph
        .devices()
        .filter(|device| device.filesystem.is_some())
        .filter_map(|device| {
            let member = grouped_holder(graph, classifier, device)?;
            let containers = graph
                .containers(member)
                .into_iter()
                .filter(|container| container.kind.groups_members())
                .map(|container| container.describe())
                .collect::<Vec<_>>();
            Some(if member.sid == device.sid {
                Finding::fatal(format!(
                    "Device '{}' belongs to {} and cannot hold a filesystem directly",
                    device.name,
                    containers.join(", ")
                ))
            } else {
                Finding::fatal(format!(
                    "Device '{}' is on '{}', which belongs to {}, and cannot hold a filesystem",
                    device.name,
                    member.name,
                    containers.join(", ")
                ))
            })
        })
        .collect()
}

/// Returns the first grouped device found walking up from the device through
/// its holders, the device itself included.
fn grouped_holder<'a>(
    graph: &'a DeviceGraph,
    classifier: &DeviceClassifier,
    device: &'a Device,
) -> Option<&'a Device> {
    let mut current = device;
    // Bounded in case the description contains a cycle of parents
    for _ in 0..graph.len() {
        if classifier.is_grouped(current) {
            return Some(current);
        }
        current = graph.holder(current)?;
    }
    None
}

/// A swap device is recommended.
fn check_swap(graph: &DeviceGraph) -> Option<Finding> {
    (!graph.devices().any(|device| {
        device
            .filesystem
            .as_ref()
            .is_some_and(|fs| fs.fs_type.is_swap())
    }))
    .then(|| Finding::advisory("There is no swap device; the system may run out of memory"))
}

/// The root filesystem should be big enough for a working system.
fn check_root_size(graph: &DeviceGraph, min_root_size: u64) -> Vec<Finding> {
    graph
        .devices()
        .filter(|device| device.is_root())
        .filter_map(|device| Some((device, device.size?)))
        .filter(|(_, size)| *size < min_root_size)
        .map(|(device, size)| {
            Finding::advisory(format!(
                "The root filesystem on '{}' is {} MiB, at least {} MiB are recommended",
                device.name,
                size / (1024 * 1024),
                min_root_size / (1024 * 1024)
            ))
        })
        .collect()
}

/// Software RAIDs need at least two members to provide any redundancy.
fn check_raid_members(graph: &DeviceGraph) -> Vec<Finding> {
    graph
        .devices_of_kind(DeviceKindFlag::SoftwareRaid)
        .filter_map(|raid| {
            let count = graph.members(raid).len();
            (count < MIN_RAID_MEMBERS).then(|| {
                Finding::advisory(format!(
                    "The {} '{}' has {} member(s), at least {} are needed for redundancy",
                    DeviceKind::SoftwareRaid,
                    raid.name,
                    count,
                    MIN_RAID_MEMBERS
                ))
            })
        })
        .collect()
}
