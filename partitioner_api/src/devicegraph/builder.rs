//! # Device graph builder
//!
//! This module contains the core logic to build a device graph from a list of
//! device descriptions.
//!
//! The struct DeviceGraphBuilder collects all descriptions. After entering
//! all of them, the build() function is called to build the graph.
//!
//! The build() function will:
//! - Assign storage ids in discovery order.
//! - Check that device names are unique and not empty.
//! - Check that only devices able to hold a filesystem have one.
//! - Add the member, child and backing edges described by each device.
//!
//! References to devices that are not part of the description are not an
//! error: the graph provider is trusted to be consistent, so a dangling
//! reference only means that a relation is unknown. Such references, and
//! references of a device to itself, are skipped with a warning and the rest
//! of the graph is built normally.

use std::collections::BTreeMap;

use log::{debug, trace, warn};

use crate::{DeviceName, DeviceSid};

use super::{
    description::DeviceDescription,
    device::{Device, FileSystemType},
    error::DeviceGraphBuildError,
    graph::{DeviceGraph, DevicePetgraph, NodeIndex},
    types::{DeviceKind, Relation},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceGraphBuilder {
    devices: Vec<DeviceDescription>,
}

impl DeviceGraphBuilder {
    /// Adds a new device to the graph.
    pub fn add_device(&mut self, device: DeviceDescription) {
        self.devices.push(device);
    }

    /// Builds the device graph.
    pub fn build(self) -> Result<DeviceGraph, DeviceGraphBuildError> {
        debug!("Building device graph");
        let relations = self
            .devices
            .iter()
            .map(|desc| (desc.name.clone(), desc.kind, described_relations(desc)))
            .collect::<Vec<_>>();

        // Populate the graph with all nodes and check that all devices have
        // unique names.
        let (mut graph, name_index_map) = populate_graph_nodes(self.devices)?;

        trace!("Populating edges");
        for (name, kind, references) in relations {
            let source_idx = name_index_map[&name];
            for (relation, target, reversed) in references {
                if target == name {
                    warn!("Ignoring {relation} reference from {kind} '{name}' to itself");
                    continue;
                }

                let Some(target_idx) = name_index_map.get(&target) else {
                    warn!(
                        "Ignoring {relation} reference from {kind} '{name}' to unknown device '{target}'"
                    );
                    continue;
                };

                let (from, to) = if reversed {
                    (*target_idx, source_idx)
                } else {
                    (source_idx, *target_idx)
                };
                trace!(
                    "Adding {relation} edge: '{}' -> '{}'",
                    graph[from].name,
                    graph[to].name
                );
                graph.add_edge(from, to, relation);
            }
        }

        let sid_index = graph
            .node_indices()
            .map(|idx| (graph[idx].sid, idx))
            .collect();

        debug!(
            "Device graph built successfully with {} devices and {} relations",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(DeviceGraph {
            inner: graph,
            sid_index,
        })
    }
}

/// Returns the relations declared by a description as tuples of (relation,
/// other device, whether the edge goes from the other device to this one).
fn described_relations(desc: &DeviceDescription) -> Vec<(Relation, DeviceName, bool)> {
    desc.members
        .iter()
        .map(|member| (Relation::Member, member.clone(), false))
        .chain(
            desc.parent
                .iter()
                .map(|parent| (Relation::Child, parent.clone(), true)),
        )
        .chain(
            desc.backing
                .iter()
                .map(|backing| (Relation::Backing, backing.clone(), false)),
        )
        .collect()
}

/// Populates a basic graph with all nodes.
///
/// Name uniqueness and per-device attributes are checked here.
///
/// Edges are NOT added at this stage.
fn populate_graph_nodes(
    devices: Vec<DeviceDescription>,
) -> Result<(DevicePetgraph, BTreeMap<DeviceName, NodeIndex>), DeviceGraphBuildError> {
    let mut graph = DevicePetgraph::with_capacity(devices.len(), devices.len());
    let mut name_index_map: BTreeMap<DeviceName, NodeIndex> = BTreeMap::new();

    for (position, desc) in devices.into_iter().enumerate() {
        if desc.name.trim().is_empty() {
            return Err(DeviceGraphBuildError::EmptyDeviceName(desc.kind));
        }

        if name_index_map.contains_key(&desc.name) {
            return Err(DeviceGraphBuildError::DuplicateDeviceName(desc.name));
        }

        if let Some(fs) = &desc.filesystem {
            if !can_hold_filesystem(desc.kind, fs.fs_type) {
                return Err(DeviceGraphBuildError::UnexpectedFilesystem {
                    name: desc.name,
                    kind: desc.kind,
                    fs_type: fs.fs_type,
                });
            }
        }

        let device = Device {
            sid: position as DeviceSid + 1,
            name: desc.name,
            kind: desc.kind,
            size: desc.size,
            filesystem: desc.filesystem,
        };

        trace!("Adding device: {}", device.describe());
        let name = device.name.clone();
        let idx = graph.add_node(device);
        name_index_map.insert(name, idx);
    }

    Ok((graph, name_index_map))
}

/// Returns whether a device of the given kind can directly hold a filesystem
/// of the given type.
fn can_hold_filesystem(kind: DeviceKind, fs_type: FileSystemType) -> bool {
    match kind {
        DeviceKind::LvmVg | DeviceKind::LvmPv => false,
        DeviceKind::Nfs => fs_type == FileSystemType::Nfs,
        DeviceKind::Disk
        | DeviceKind::Dasd
        | DeviceKind::Multipath
        | DeviceKind::BiosRaid
        | DeviceKind::SoftwareRaid
        | DeviceKind::Partition
        | DeviceKind::LvmLv
        | DeviceKind::XenPartition
        | DeviceKind::Encryption => !matches!(fs_type, FileSystemType::Nfs | FileSystemType::Tmpfs),
    }
}
