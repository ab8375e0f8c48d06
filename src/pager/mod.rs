//! # Pager
//!
//! The overview of the partitioner is a tree of pages. Most pages are bound to
//! a device of the device graph, some represent a whole category of devices
//! and a few (summary, settings) are not related to devices at all.
//!
//! ## Layout
//!
//! ```text
//! <hostname>
//! ├── Hard Disks
//! │   └── one page per pageable disk-like device, partitions as sub-pages
//! ├── RAID
//! │   └── one page per software RAID, partitions as sub-pages
//! ├── Volume Management
//! │   └── one page per volume group, logical volumes as sub-pages
//! └── NFS ------------------> # Single page for all NFS mounts.
//! Device Graph -------------> # Only with graphical support.
//! Summary
//! Settings
//! ```
//!
//! Members of multipath devices and BIOS RAIDs have no page: they are only
//! shown through their container. Trees are immutable values; when the device
//! graph changes, a new tree is built and replaces the old one.

use partitioner_api::devicegraph::{Device, DeviceCategory, DeviceKind};

mod builder;
pub mod display;
mod locator;

pub use builder::{build_tree, PageTreeBuilder};
pub use locator::{find_page, find_page_by_id, find_page_by_kind, Walk};

/// What a page is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// The system page, root of all device categories.
    System,

    /// A category of devices, e.g. all RAIDs.
    Category(DeviceCategory),

    /// A page of a single device.
    Device(DeviceKind),

    DeviceGraph,
    Summary,
    Settings,
}

/// The devices a page represents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageBinding {
    #[default]
    None,

    /// A page of a single device.
    Device(Device),

    /// A page representing a group of devices, e.g. all NFS mounts.
    Group(Vec<Device>),
}

/// Pages nested into a device page, e.g. the partitions of a disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubPager {
    pub pages: Vec<PageNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNode {
    /// Identifier of the page, unique in the tree.
    pub id: String,

    /// Text shown for the page.
    pub label: String,

    pub kind: PageKind,

    pub binding: PageBinding,

    /// Pages below this one in the tree, in order.
    pub children: Vec<PageNode>,

    /// Pages nested into this one.
    pub pager: Option<SubPager>,
}

impl PageNode {
    pub(crate) fn new(id: impl Into<String>, label: impl Into<String>, kind: PageKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            binding: PageBinding::None,
            children: Vec::new(),
            pager: None,
        }
    }

    /// Returns the device of a single device page.
    pub fn device(&self) -> Option<&Device> {
        match &self.binding {
            PageBinding::Device(device) => Some(device),
            PageBinding::None | PageBinding::Group(_) => None,
        }
    }

    /// Returns whether the page represents the given device.
    pub fn represents(&self, device: &Device) -> bool {
        match &self.binding {
            PageBinding::None => false,
            PageBinding::Device(bound) => bound.is(device),
            PageBinding::Group(members) => members.iter().any(|member| member.is(device)),
        }
    }

    /// Returns the pages of the nested pager, if any.
    pub fn sub_pages(&self) -> &[PageNode] {
        self.pager
            .as_ref()
            .map(|pager| pager.pages.as_slice())
            .unwrap_or_default()
    }
}

/// The whole navigation tree of the partitioner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTree {
    pub roots: Vec<PageNode>,
}

impl PageTree {
    /// Returns all pages in depth-first pre-order.
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.roots)
    }

    /// Returns the number of pages in the tree.
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}
