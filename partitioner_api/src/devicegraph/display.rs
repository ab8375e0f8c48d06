//! Display implementations for the types in the devicegraph module.

use std::fmt::Display;

use super::{
    checker::Severity,
    device::FileSystemType,
    features::StorageFeature,
    types::{DeviceCategory, DeviceKind, DeviceKindFlag, Relation},
};

impl Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disk => write!(f, "disk"),
            Self::Dasd => write!(f, "dasd"),
            Self::Multipath => write!(f, "multipath"),
            Self::BiosRaid => write!(f, "bios-raid"),
            Self::SoftwareRaid => write!(f, "software-raid"),
            Self::Partition => write!(f, "partition"),
            Self::LvmVg => write!(f, "lvm-vg"),
            Self::LvmPv => write!(f, "lvm-pv"),
            Self::LvmLv => write!(f, "lvm-lv"),
            Self::Nfs => write!(f, "nfs"),
            Self::XenPartition => write!(f, "xen-partition"),
            Self::Encryption => write!(f, "encryption"),
        }
    }
}

impl Display for DeviceKindFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_readable())
    }
}

impl Display for DeviceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disks => write!(f, "Hard Disks"),
            Self::Raid => write!(f, "RAID"),
            Self::VolumeGroups => write!(f, "Volume Management"),
            Self::Nfs => write!(f, "NFS"),
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Child => write!(f, "child"),
            Self::Backing => write!(f, "backing"),
        }
    }
}

impl Display for FileSystemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &'static str = self.into();
        write!(f, "{name}")
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fatal => write!(f, "fatal"),
            Self::Advisory => write!(f, "advisory"),
        }
    }
}

impl Display for StorageFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &'static str = self.into();
        write!(f, "{name}")
    }
}
