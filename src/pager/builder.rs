use log::{debug, trace};

use partitioner_api::devicegraph::{
    Device, DeviceCategory, DeviceClassifier, DeviceGraph, DeviceKindFlag,
};

use crate::collaborators::EnvironmentFlags;

use super::{PageBinding, PageKind, PageNode, PageTree, SubPager};

/// Label of the system page when no hostname is given.
const DEFAULT_SYSTEM_LABEL: &str = "System";

/// Builds the page tree for a device graph.
pub fn build_tree(graph: &DeviceGraph, flags: &dyn EnvironmentFlags) -> PageTree {
    PageTreeBuilder::new(graph, flags).build()
}

pub struct PageTreeBuilder<'a> {
    graph: &'a DeviceGraph,
    flags: &'a dyn EnvironmentFlags,
    system_label: String,
}

impl<'a> PageTreeBuilder<'a> {
    pub fn new(graph: &'a DeviceGraph, flags: &'a dyn EnvironmentFlags) -> Self {
        Self {
            graph,
            flags,
            system_label: DEFAULT_SYSTEM_LABEL.into(),
        }
    }

    /// Sets the label of the system page, usually the hostname.
    pub fn with_system_label(mut self, label: impl Into<String>) -> Self {
        self.system_label = label.into();
        self
    }

    pub fn build(self) -> PageTree {
        debug!("Building page tree for {} devices", self.graph.len());
        let classifier = DeviceClassifier::new(self.graph);

        let mut system = PageNode::new("system", &self.system_label, PageKind::System);
        system.children = vec![
            self.category_page(DeviceCategory::Disks, &classifier),
            self.category_page(DeviceCategory::Raid, &classifier),
            self.category_page(DeviceCategory::VolumeGroups, &classifier),
            self.nfs_page(&classifier),
        ];

        let mut roots = vec![system];
        if self.flags.supports_graphical_view() {
            roots.push(PageNode::new(
                "device-graph",
                "Device Graph",
                PageKind::DeviceGraph,
            ));
        } else {
            trace!("No graphical support, skipping the device graph page");
        }
        roots.push(PageNode::new("summary", "Summary", PageKind::Summary));
        roots.push(PageNode::new("settings", "Settings", PageKind::Settings));

        let tree = PageTree { roots };
        debug!("Page tree built with {} pages", tree.len());
        tree
    }

    /// Returns the pageable devices of a category, in discovery order.
    fn pageable<'g>(
        &'g self,
        category: DeviceCategory,
        classifier: &'g DeviceClassifier,
    ) -> impl Iterator<Item = &'g Device> + 'g {
        self.graph
            .devices()
            .filter(move |device| device.kind.category() == Some(category))
            .filter(move |device| {
                let grouped = classifier.is_grouped(device);
                if grouped {
                    trace!("Not paging grouped member {}", device.describe());
                }
                !grouped
            })
    }

    fn category_page(&self, category: DeviceCategory, classifier: &DeviceClassifier) -> PageNode {
        let mut page = PageNode::new(
            category_id(category),
            category.to_string(),
            PageKind::Category(category),
        );
        page.children = self
            .pageable(category, classifier)
            .map(|device| self.device_page(device))
            .collect();
        page
    }

    /// All NFS mounts share a single page.
    fn nfs_page(&self, classifier: &DeviceClassifier) -> PageNode {
        let category = DeviceCategory::Nfs;
        let mut page = PageNode::new(
            category_id(category),
            category.to_string(),
            PageKind::Category(category),
        );
        page.binding = PageBinding::Group(self.pageable(category, classifier).cloned().collect());
        page
    }

    fn device_page(&self, device: &Device) -> PageNode {
        trace!("Adding page for {}", device.describe());
        let mut page = PageNode::new(
            device_page_id(device),
            device.name.clone(),
            PageKind::Device(device.kind),
        );
        page.binding = PageBinding::Device(device.clone());

        if device.kind.has_subpager() {
            page.pager = Some(SubPager {
                pages: self
                    .graph
                    .children(device)
                    .into_iter()
                    .filter(|child| DeviceKindFlag::SubPage.contains(child.kind.as_flag()))
                    .map(|child| self.device_page(child))
                    .collect(),
            });
        }

        page
    }
}

fn category_id(category: DeviceCategory) -> &'static str {
    match category {
        DeviceCategory::Disks => "disks",
        DeviceCategory::Raid => "raid",
        DeviceCategory::VolumeGroups => "volume-groups",
        DeviceCategory::Nfs => "nfs",
    }
}

/// Returns the id of the page of a device, e.g. `disk:/dev/sda`.
pub(super) fn device_page_id(device: &Device) -> String {
    format!("{}:{}", device.kind, device.name)
}

#[cfg(test)]
pub(super) mod tests {
    use super::*;

    use indoc::indoc;

    use partitioner_api::devicegraph::DeviceGraphDescription;

    use crate::pager::find_page;

    pub(crate) struct Flags {
        pub graphical: bool,
    }

    impl EnvironmentFlags for Flags {
        fn supports_graphical_view(&self) -> bool {
            self.graphical
        }

        fn is_first_installation(&self) -> bool {
            false
        }
    }

    pub(crate) fn graph(yaml: &str) -> DeviceGraph {
        DeviceGraphDescription::from_yaml(yaml)
            .unwrap()
            .build()
            .unwrap()
    }

    pub(crate) const SAMPLE: &str = indoc! {r#"
        devices:
          - name: /dev/sda
            kind: disk
          - name: /dev/sdb
            kind: disk
          - name: /dev/mapper/36005076305ffc73a00000000000013b4
            kind: multipath
            members: [/dev/sda, /dev/sdb]
          - name: /dev/mapper/36005076305ffc73a00000000000013b4-part1
            kind: partition
            parent: /dev/mapper/36005076305ffc73a00000000000013b4
            filesystem: { type: ext4, mount-point: / }
          - name: /dev/dasda
            kind: dasd
          - name: /dev/sdc
            kind: disk
          - name: /dev/sdc1
            kind: partition
            parent: /dev/sdc
          - name: /dev/sdc2
            kind: partition
            parent: /dev/sdc
          - name: /dev/sdd
            kind: disk
          - name: /dev/md0
            kind: software-raid
            members: [/dev/sdc1, /dev/sdd]
          - name: pv-sdc2
            kind: lvm-pv
            backing: /dev/sdc2
          - name: vg0
            kind: lvm-vg
            members: [pv-sdc2]
          - name: /dev/vg0/home
            kind: lvm-lv
            parent: vg0
          - name: srv:/home
            kind: nfs
            filesystem: { type: nfs, mount-point: /mnt/home }
          - name: srv:/data
            kind: nfs
            filesystem: { type: nfs, mount-point: /mnt/data }
    "#};

    fn ids(pages: &[PageNode]) -> Vec<&str> {
        pages.iter().map(|page| page.id.as_str()).collect()
    }

    fn category<'t>(tree: &'t PageTree, id: &str) -> &'t PageNode {
        tree.roots[0]
            .children
            .iter()
            .find(|page| page.id == id)
            .unwrap()
    }

    #[test]
    fn test_layout() {
        let graph = graph(SAMPLE);
        let tree = PageTreeBuilder::new(&graph, &Flags { graphical: true })
            .with_system_label("storage-lab")
            .build();

        assert_eq!(
            ids(&tree.roots),
            vec!["system", "device-graph", "summary", "settings"]
        );
        assert_eq!(tree.roots[0].label, "storage-lab");
        assert_eq!(
            ids(&tree.roots[0].children),
            vec!["disks", "raid", "volume-groups", "nfs"]
        );
        assert_eq!(
            tree.roots[0]
                .children
                .iter()
                .map(|page| page.label.as_str())
                .collect::<Vec<_>>(),
            vec!["Hard Disks", "RAID", "Volume Management", "NFS"]
        );
        for page in &tree.roots[1..] {
            assert_eq!(page.binding, PageBinding::None);
            assert!(page.children.is_empty());
        }
    }

    #[test]
    fn test_disks_in_discovery_order() {
        let graph = graph(SAMPLE);
        let tree = build_tree(&graph, &Flags { graphical: false });

        assert_eq!(
            ids(&category(&tree, "disks").children),
            vec![
                "multipath:/dev/mapper/36005076305ffc73a00000000000013b4",
                "dasd:/dev/dasda",
                "disk:/dev/sdc",
                "disk:/dev/sdd",
            ]
        );
    }

    #[test]
    fn test_sub_pagers() {
        let graph = graph(SAMPLE);
        let tree = build_tree(&graph, &Flags { graphical: false });

        let disks = category(&tree, "disks");
        assert_eq!(
            ids(disks.children[0].sub_pages()),
            vec!["partition:/dev/mapper/36005076305ffc73a00000000000013b4-part1"]
        );
        assert_eq!(
            ids(disks.children[2].sub_pages()),
            vec!["partition:/dev/sdc1", "partition:/dev/sdc2"]
        );
        // Disks without partitions still own an empty pager
        assert_eq!(disks.children[3].pager, Some(SubPager::default()));

        let raids = category(&tree, "raid");
        assert_eq!(ids(&raids.children), vec!["software-raid:/dev/md0"]);

        let vgs = category(&tree, "volume-groups");
        assert_eq!(ids(&vgs.children), vec!["lvm-vg:vg0"]);
        assert_eq!(ids(vgs.children[0].sub_pages()), vec!["lvm-lv:/dev/vg0/home"]);
        assert!(vgs.children[0].sub_pages()[0].pager.is_none());
    }

    #[test]
    fn test_grouped_members_have_no_page() {
        let graph = graph(SAMPLE);
        let tree = build_tree(&graph, &Flags { graphical: true });

        for name in ["/dev/sda", "/dev/sdb"] {
            let device = graph.device_by_name(name).unwrap();
            assert!(find_page(&tree, device).is_none(), "'{name}' has a page");
        }

        let mpath = graph
            .device_by_name("/dev/mapper/36005076305ffc73a00000000000013b4")
            .unwrap();
        assert_eq!(tree.walk().filter(|page| page.represents(mpath)).count(), 1);
    }

    #[test]
    fn test_raid_and_pv_members_keep_pages() {
        let graph = graph(SAMPLE);
        let tree = build_tree(&graph, &Flags { graphical: true });

        // Members of a software RAID keep their pages
        let sdd = graph.device_by_name("/dev/sdd").unwrap();
        assert_eq!(find_page(&tree, sdd).unwrap().id, "disk:/dev/sdd");
        let sdc1 = graph.device_by_name("/dev/sdc1").unwrap();
        assert_eq!(find_page(&tree, sdc1).unwrap().id, "partition:/dev/sdc1");

        // The partition behind a physical volume too, the physical volume
        // itself is no page
        let sdc2 = graph.device_by_name("/dev/sdc2").unwrap();
        assert_eq!(find_page(&tree, sdc2).unwrap().id, "partition:/dev/sdc2");
        let pv = graph.device_by_name("pv-sdc2").unwrap();
        assert!(find_page(&tree, pv).is_none());
    }

    #[test]
    fn test_bios_raid() {
        let graph = graph(indoc! {r#"
            devices:
              - name: /dev/sda
                kind: disk
              - name: /dev/sdb
                kind: disk
              - name: /dev/md/imsm0
                kind: bios-raid
                members: [/dev/sda, /dev/sdb]
              - name: /dev/md/imsm0p1
                kind: partition
                parent: /dev/md/imsm0
        "#});
        let tree = build_tree(&graph, &Flags { graphical: false });

        let disks = category(&tree, "disks");
        assert_eq!(ids(&disks.children), vec!["bios-raid:/dev/md/imsm0"]);
        assert_eq!(
            ids(disks.children[0].sub_pages()),
            vec!["partition:/dev/md/imsm0p1"]
        );
        assert!(category(&tree, "raid").children.is_empty());
    }

    #[test]
    fn test_xen_partitions() {
        let graph = graph(indoc! {r#"
            devices:
              - name: /dev/xvda1
                kind: xen-partition
                filesystem: { type: ext4, mount-point: / }
              - name: /dev/xvda2
                kind: xen-partition
                filesystem: { type: swap }
              - name: /dev/xvdc
                kind: disk
              - name: /dev/xvdc1
                kind: partition
                parent: /dev/xvdc
        "#});
        let tree = build_tree(&graph, &Flags { graphical: false });

        let disks = category(&tree, "disks");
        assert_eq!(
            ids(&disks.children),
            vec![
                "xen-partition:/dev/xvda1",
                "xen-partition:/dev/xvda2",
                "disk:/dev/xvdc"
            ]
        );
        assert!(disks.children[..2].iter().all(|page| page.pager.is_none()));

        let xvdc = find_page(&tree, graph.device_by_name("/dev/xvdc").unwrap()).unwrap();
        assert_eq!(ids(xvdc.sub_pages()), vec!["partition:/dev/xvdc1"]);

        // No page stands for the Xen disk holding the stray partitions
        assert!(tree.walk().all(|page| !page.id.ends_with(":/dev/xvda")));
        assert_eq!(
            tree.walk()
                .filter(|page| matches!(page.kind, PageKind::Device(_)))
                .count(),
            4
        );
    }

    #[test]
    fn test_nfs_aggregate_page() {
        for count in [0, 1, 3] {
            let mut yaml = String::from(if count == 0 {
                "devices: []\n"
            } else {
                "devices:\n"
            });
            for i in 0..count {
                yaml += &format!("  - name: srv:/export{i}\n    kind: nfs\n");
            }
            let graph = graph(&yaml);
            let tree = build_tree(&graph, &Flags { graphical: false });

            let nfs_pages = tree
                .walk()
                .filter(|page| page.kind == PageKind::Category(DeviceCategory::Nfs))
                .collect::<Vec<_>>();
            assert_eq!(nfs_pages.len(), 1);
            assert!(nfs_pages[0].children.is_empty());
            match &nfs_pages[0].binding {
                PageBinding::Group(members) => assert_eq!(members.len(), count),
                other => panic!("Unexpected binding: {other:?}"),
            }

            for device in graph.devices() {
                assert_eq!(find_page(&tree, device).unwrap().id, "nfs");
            }
        }
    }

    #[test]
    fn test_device_graph_flag() {
        let graph = graph(SAMPLE);
        let with = build_tree(&graph, &Flags { graphical: true });
        let without = build_tree(&graph, &Flags { graphical: false });

        assert_eq!(with.len(), without.len() + 1);
        let mut reduced = with.clone();
        reduced.roots.retain(|page| page.kind != PageKind::DeviceGraph);
        assert_eq!(reduced, without);
    }

    #[test]
    fn test_idempotent() {
        let graph = graph(SAMPLE);
        let flags = Flags { graphical: true };
        assert_eq!(build_tree(&graph, &flags), build_tree(&graph, &flags));
    }

    #[test]
    fn test_empty_graph() {
        let tree = build_tree(&DeviceGraph::default(), &Flags { graphical: false });
        assert_eq!(ids(&tree.roots), vec!["system", "summary", "settings"]);
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.roots[0].label, DEFAULT_SYSTEM_LABEL);
    }
}
