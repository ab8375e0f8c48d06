use std::collections::BTreeMap;

use petgraph::{
    csr::DefaultIx,
    graph::NodeIndex as PetgraphNodeIndex,
    visit::EdgeRef,
    Directed, Direction, Graph,
};

use crate::DeviceSid;

use super::{
    device::Device,
    types::{DeviceKindFlag, Relation},
};

/// The type of the node index used in the DeviceGraph.
pub(super) type NodeIndex = PetgraphNodeIndex<DefaultIx>;

/// The type of the graph used to store devices and their relationships.
pub(super) type DevicePetgraph = Graph<Device, Relation, Directed, DefaultIx>;

/// Immutable snapshot of the storage devices of a system.
///
/// Devices are enumerated in discovery order, i.e. the order in which they
/// were added to the builder.
#[derive(Debug, Clone, Default)]
pub struct DeviceGraph {
    pub(super) inner: DevicePetgraph,
    pub(super) sid_index: BTreeMap<DeviceSid, NodeIndex>,
}

impl DeviceGraph {
    /// Returns the number of devices in the graph.
    pub fn len(&self) -> usize {
        self.inner.node_count()
    }

    /// Returns whether the graph has no devices at all.
    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Returns an iterator over all devices, in discovery order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.inner.node_weights()
    }

    /// Returns an iterator over all devices of any of the given kinds, in
    /// discovery order.
    pub fn devices_of_kind(&self, kinds: DeviceKindFlag) -> impl Iterator<Item = &Device> {
        self.devices()
            .filter(move |device| kinds.contains(device.kind.as_flag()))
    }

    /// Returns the device with the given name.
    pub fn device_by_name(&self, name: &str) -> Option<&Device> {
        self.devices().find(|device| device.name == name)
    }

    /// Returns the device with the given storage id.
    pub fn device_by_sid(&self, sid: DeviceSid) -> Option<&Device> {
        self.sid_index.get(&sid).map(|idx| &self.inner[*idx])
    }

    /// Returns whether the very same device is part of this graph.
    pub fn contains(&self, device: &Device) -> bool {
        self.node_index(device).is_some()
    }

    /// Returns the direct members of a container, in discovery order.
    pub fn members(&self, container: &Device) -> Vec<&Device> {
        self.related(container, Relation::Member, Direction::Outgoing)
    }

    /// Returns the containers the device is a direct member of.
    pub fn containers(&self, device: &Device) -> Vec<&Device> {
        self.related(device, Relation::Member, Direction::Incoming)
    }

    /// Returns the devices derived from a holder, e.g. the partitions of a
    /// disk, in discovery order.
    pub fn children(&self, holder: &Device) -> Vec<&Device> {
        self.related(holder, Relation::Child, Direction::Outgoing)
    }

    /// Returns the holder a device is derived from, if any.
    pub fn holder(&self, device: &Device) -> Option<&Device> {
        self.related(device, Relation::Child, Direction::Incoming)
            .into_iter()
            .next()
    }

    /// Returns the device the given one sits on top of, if any.
    pub fn backing(&self, device: &Device) -> Option<&Device> {
        self.related(device, Relation::Backing, Direction::Outgoing)
            .into_iter()
            .next()
    }

    /// Returns the node index of the given device, when it belongs to this
    /// graph.
    pub(super) fn node_index(&self, device: &Device) -> Option<NodeIndex> {
        self.sid_index
            .get(&device.sid)
            .copied()
            .filter(|idx| self.inner[*idx].is(device))
    }

    /// Returns the devices related to the given one by edges of the given
    /// relation and direction, sorted in discovery order.
    fn related(&self, device: &Device, relation: Relation, direction: Direction) -> Vec<&Device> {
        let Some(idx) = self.node_index(device) else {
            return Vec::new();
        };

        // Petgraph walks edges from the most recently added one, so sort the
        // neighbors back into discovery order.
        let mut neighbors = self
            .inner
            .edges_directed(idx, direction)
            .filter(|edge| *edge.weight() == relation)
            .map(|edge| match direction {
                Direction::Outgoing => edge.target(),
                Direction::Incoming => edge.source(),
            })
            .collect::<Vec<_>>();
        neighbors.sort();
        neighbors.dedup();

        neighbors.into_iter().map(|idx| &self.inner[idx]).collect()
    }
}
