//! Basic types for the device graph, including the per-kind classification
//! table used to decide how each kind of device is represented in the
//! partitioner overview.

use serde::{Deserialize, Serialize};

/// Enum for supported device kinds.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
pub enum DeviceKind {
    /// A regular disk
    Disk,

    /// A DASD (s390 Direct Access Storage Device)
    Dasd,

    /// A multipath device, grouping several paths (disks) to the same storage
    Multipath,

    /// A BIOS RAID (e.g. Intel IMSM or DDF), grouping several disks
    BiosRaid,

    /// A Linux software RAID (MD)
    SoftwareRaid,

    /// A partition of a partitionable device
    Partition,

    /// An LVM volume group
    LvmVg,

    /// An LVM physical volume, member of a volume group
    LvmPv,

    /// An LVM logical volume
    LvmLv,

    /// An NFS mount
    Nfs,

    /// A Xen virtual partition, exposed to the guest as a stray block device
    XenPartition,

    /// An encryption layer (LUKS) on top of another block device
    Encryption,
}

bitflags::bitflags! {
    /// Bitflags for supported device kinds
    ///
    /// MUST MATCH THE CONTENTS OF DeviceKind
    #[derive(Serialize, Deserialize, Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub struct DeviceKindFlag: u32 {
        const Disk = 1;
        const Dasd = 1 << 1;
        const Multipath = 1 << 2;
        const BiosRaid = 1 << 3;
        const SoftwareRaid = 1 << 4;
        const Partition = 1 << 5;
        const LvmVg = 1 << 6;
        const LvmPv = 1 << 7;
        const LvmLv = 1 << 8;
        const Nfs = 1 << 9;
        const XenPartition = 1 << 10;
        const Encryption = 1 << 11;

        // Groups:

        /// Kinds shown as pages under the "Disks" category.
        const DiskDevice = Self::Disk.bits()
            | Self::Dasd.bits()
            | Self::Multipath.bits()
            | Self::BiosRaid.bits()
            | Self::XenPartition.bits();

        /// Containers whose members are represented only through the
        /// container's own page.
        const Grouping = Self::Multipath.bits() | Self::BiosRaid.bits();

        /// Kinds that can hold partitions.
        const Partitionable = Self::Disk.bits()
            | Self::Dasd.bits()
            | Self::Multipath.bits()
            | Self::BiosRaid.bits()
            | Self::SoftwareRaid.bits();

        /// Kinds shown inside the sub-pager of their holder's page.
        const SubPage = Self::Partition.bits() | Self::LvmLv.bits();
    }
}

/// Category of the partitioner overview a pageable device belongs to.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceCategory {
    /// Disk-like devices: disks, DASDs, multipath, BIOS RAIDs, Xen partitions.
    Disks,

    /// Software RAIDs.
    Raid,

    /// LVM volume groups.
    VolumeGroups,

    /// NFS mounts, all of them sharing a single page.
    Nfs,
}

/// Kind of relation between two devices in the graph.
///
/// Edges always go from the referrer to the referenced device: a container
/// points to its members, a holder to its children and a layered device to
/// its backing device.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    /// The target is a component of the source (e.g. multipath -> disk,
    /// volume group -> physical volume).
    Member,

    /// The target is derived from the source (e.g. disk -> partition, volume
    /// group -> logical volume).
    Child,

    /// The source sits on top of the target (e.g. physical volume ->
    /// partition).
    Backing,
}

/// Classification table.
///
/// Every decision about how a device kind is represented lives here so that
/// it can be audited and tested per kind.
impl DeviceKind {
    /// Returns the flag associated with the device kind.
    pub fn as_flag(&self) -> DeviceKindFlag {
        match self {
            Self::Disk => DeviceKindFlag::Disk,
            Self::Dasd => DeviceKindFlag::Dasd,
            Self::Multipath => DeviceKindFlag::Multipath,
            Self::BiosRaid => DeviceKindFlag::BiosRaid,
            Self::SoftwareRaid => DeviceKindFlag::SoftwareRaid,
            Self::Partition => DeviceKindFlag::Partition,
            Self::LvmVg => DeviceKindFlag::LvmVg,
            Self::LvmPv => DeviceKindFlag::LvmPv,
            Self::LvmLv => DeviceKindFlag::LvmLv,
            Self::Nfs => DeviceKindFlag::Nfs,
            Self::XenPartition => DeviceKindFlag::XenPartition,
            Self::Encryption => DeviceKindFlag::Encryption,
        }
    }

    /// Returns the overview category of a device of this kind, or None when
    /// devices of this kind never get a top level page of their own.
    ///
    /// Partitions and logical volumes are still paged, but inside the
    /// sub-pager of their holder.
    pub fn category(&self) -> Option<DeviceCategory> {
        match self {
            Self::Disk | Self::Dasd | Self::Multipath | Self::BiosRaid | Self::XenPartition => {
                Some(DeviceCategory::Disks)
            }
            Self::SoftwareRaid => Some(DeviceCategory::Raid),
            Self::LvmVg => Some(DeviceCategory::VolumeGroups),
            Self::Nfs => Some(DeviceCategory::Nfs),
            Self::Partition | Self::LvmPv | Self::LvmLv | Self::Encryption => None,
        }
    }

    /// Returns whether a container of this kind hides its direct members.
    ///
    /// Only multipath devices and BIOS RAIDs do. Volume groups and software
    /// RAIDs are containers too, but their members keep their own pages.
    pub fn groups_members(&self) -> bool {
        match self {
            Self::Multipath | Self::BiosRaid => true,
            Self::Disk
            | Self::Dasd
            | Self::SoftwareRaid
            | Self::Partition
            | Self::LvmVg
            | Self::LvmPv
            | Self::LvmLv
            | Self::Nfs
            | Self::XenPartition
            | Self::Encryption => false,
        }
    }

    /// Returns whether the page of a device of this kind owns a sub-pager
    /// with the pages of its children.
    pub fn has_subpager(&self) -> bool {
        self.as_flag()
            .intersects(DeviceKindFlag::Partitionable | DeviceKindFlag::LvmVg)
    }
}

impl DeviceKindFlag {
    /// Converts the flag to a vector of device kinds.
    pub fn kinds(self) -> Vec<DeviceKind> {
        self.iter()
            .map(|kind| match kind {
                DeviceKindFlag::Disk => DeviceKind::Disk,
                DeviceKindFlag::Dasd => DeviceKind::Dasd,
                DeviceKindFlag::Multipath => DeviceKind::Multipath,
                DeviceKindFlag::BiosRaid => DeviceKind::BiosRaid,
                DeviceKindFlag::SoftwareRaid => DeviceKind::SoftwareRaid,
                DeviceKindFlag::Partition => DeviceKind::Partition,
                DeviceKindFlag::LvmVg => DeviceKind::LvmVg,
                DeviceKindFlag::LvmPv => DeviceKind::LvmPv,
                DeviceKindFlag::LvmLv => DeviceKind::LvmLv,
                DeviceKindFlag::Nfs => DeviceKind::Nfs,
                DeviceKindFlag::XenPartition => DeviceKind::XenPartition,
                DeviceKindFlag::Encryption => DeviceKind::Encryption,
                _ => unreachable!("Invalid device kind flag: {:?}", kind),
            })
            .collect()
    }

    /// Returns a human readable list of the kinds in the flag.
    pub fn user_readable(self) -> String {
        if self.is_empty() {
            return "(none)".into();
        }

        self.kinds()
            .iter()
            .map(|kind| kind.to_string())
            .collect::<Vec<String>>()
            .join(" or ")
    }
}
