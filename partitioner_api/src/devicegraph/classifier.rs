//! Detection of grouped members.
//!
//! A grouped member is a device represented solely through the page of a
//! container that groups its members (multipath, BIOS RAID). The exclusion
//! sets are computed per container kind from the direct member relations of
//! the graph; membership is not followed any further.

use std::collections::{BTreeMap, BTreeSet};

use log::trace;

use crate::DeviceSid;

use super::{
    device::Device,
    graph::DeviceGraph,
    types::{DeviceKind, DeviceKindFlag},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceClassifier {
    /// Grouped members, per container kind.
    grouped: BTreeMap<DeviceKind, BTreeSet<DeviceSid>>,
}

impl DeviceClassifier {
    /// Computes the grouped members of every grouping container in the graph.
    pub fn new(graph: &DeviceGraph) -> Self {
        let mut grouped: BTreeMap<DeviceKind, BTreeSet<DeviceSid>> = BTreeMap::new();

        for container in graph.devices_of_kind(DeviceKindFlag::Grouping) {
            debug_assert!(container.kind.groups_members());
            let members = graph.members(container);
            trace!(
                "{} groups {} member(s)",
                container.describe(),
                members.len()
            );
            grouped
                .entry(container.kind)
                .or_default()
                .extend(members.into_iter().map(|member| member.sid));
        }

        Self { grouped }
    }

    /// Returns whether the device is a member of a container that represents
    /// it, and therefore must not get a page of its own.
    pub fn is_grouped(&self, device: &Device) -> bool {
        self.grouped
            .values()
            .any(|members| members.contains(&device.sid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    use crate::devicegraph::description::DeviceGraphDescription;

    fn graph(yaml: &str) -> DeviceGraph {
        DeviceGraphDescription::from_yaml(yaml)
            .unwrap()
            .build()
            .unwrap()
    }

    fn grouped(graph: &DeviceGraph, classifier: &DeviceClassifier, name: &str) -> bool {
        classifier.is_grouped(graph.device_by_name(name).unwrap())
    }

    #[test]
    fn test_multipath_members() {
        let graph = graph(indoc! {r#"
            devices:
              - name: /dev/sda
                kind: disk
              - name: /dev/sdb
                kind: disk
              - name: /dev/sde
                kind: disk
              - name: /dev/dasdb
                kind: dasd
              - name: /dev/mapper/36005076305ffc73a00000000000013b4
                kind: multipath
                members: [/dev/sda, /dev/sdb]
        "#});
        let classifier = DeviceClassifier::new(&graph);

        assert!(grouped(&graph, &classifier, "/dev/sda"));
        assert!(grouped(&graph, &classifier, "/dev/sdb"));
        assert!(!grouped(&graph, &classifier, "/dev/sde"));
        assert!(!grouped(&graph, &classifier, "/dev/dasdb"));
        assert!(!grouped(
            &graph,
            &classifier,
            "/dev/mapper/36005076305ffc73a00000000000013b4"
        ));
    }

    #[test]
    fn test_bios_raid_members() {
        let graph = graph(indoc! {r#"
            devices:
              - name: /dev/sda
                kind: disk
              - name: /dev/sdb
                kind: disk
              - name: /dev/sdc
                kind: disk
              - name: /dev/sdd
                kind: disk
              - name: /dev/md/a
                kind: bios-raid
                members: [/dev/sdb, /dev/sdc]
              - name: /dev/md/b
                kind: bios-raid
                members: [/dev/sdc, /dev/sdd]
        "#});
        let classifier = DeviceClassifier::new(&graph);

        assert!(!grouped(&graph, &classifier, "/dev/sda"));
        assert!(grouped(&graph, &classifier, "/dev/sdb"));
        assert!(grouped(&graph, &classifier, "/dev/sdc"));
        assert!(grouped(&graph, &classifier, "/dev/sdd"));
        assert!(!grouped(&graph, &classifier, "/dev/md/a"));
        assert!(!grouped(&graph, &classifier, "/dev/md/b"));
    }

    #[test]
    fn test_non_grouping_containers() {
        let graph = graph(indoc! {r#"
            devices:
              - name: /dev/sda
                kind: disk
              - name: /dev/sdb
                kind: disk
              - name: /dev/sdc
                kind: disk
              - name: /dev/md0
                kind: software-raid
                members: [/dev/sda, /dev/sdb]
              - name: pv-sdc
                kind: lvm-pv
                backing: /dev/sdc
              - name: vg0
                kind: lvm-vg
                members: [pv-sdc]
        "#});
        let classifier = DeviceClassifier::new(&graph);

        for name in ["/dev/sda", "/dev/sdb", "/dev/sdc", "pv-sdc", "/dev/md0", "vg0"] {
            assert!(
                !grouped(&graph, &classifier, name),
                "'{name}' should not be grouped"
            );
        }
    }

    #[test]
    fn test_only_direct_members() {
        // A software RAID on top of a multipath device: the multipath member
        // disk is grouped, the RAID does not propagate any grouping.
        let graph = graph(indoc! {r#"
            devices:
              - name: /dev/sda
                kind: disk
              - name: /dev/mapper/mpatha
                kind: multipath
                members: [/dev/sda]
              - name: /dev/mapper/mpatha-part1
                kind: partition
                parent: /dev/mapper/mpatha
              - name: /dev/md0
                kind: software-raid
                members: [/dev/mapper/mpatha-part1]
        "#});
        let classifier = DeviceClassifier::new(&graph);

        assert!(grouped(&graph, &classifier, "/dev/sda"));
        assert!(!grouped(&graph, &classifier, "/dev/mapper/mpatha-part1"));
        assert!(!grouped(&graph, &classifier, "/dev/md0"));
    }

    #[test]
    fn test_empty_graph() {
        let graph = DeviceGraph::default();
        let classifier = DeviceClassifier::new(&graph);
        assert_eq!(classifier, DeviceClassifier::default());
    }
}
