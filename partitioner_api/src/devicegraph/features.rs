use std::collections::BTreeSet;

use log::trace;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, IntoStaticStr};

use super::{
    device::{Device, FileSystemType},
    graph::DeviceGraph,
    types::DeviceKind,
};

/// A storage technology whose tools must be available on the system to
/// manage the devices using it.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StorageFeature {
    Btrfs,
    Xfs,
    Ext,
    Vfat,
    Ntfs,
    Lvm,
    Raid,
    Multipath,
    Encryption,
    Nfs,
    Dasd,
}

impl StorageFeature {
    /// Returns the packages providing the tools for this feature.
    pub fn packages(&self) -> &'static [&'static str] {
        match self {
            Self::Btrfs => &["btrfsprogs"],
            Self::Xfs => &["xfsprogs"],
            Self::Ext => &["e2fsprogs"],
            Self::Vfat => &["dosfstools"],
            Self::Ntfs => &["ntfs-3g"],
            Self::Lvm => &["lvm2"],
            Self::Raid => &["mdadm"],
            Self::Multipath => &["multipath-tools"],
            Self::Encryption => &["cryptsetup"],
            Self::Nfs => &["nfs-client"],
            Self::Dasd => &["s390-tools"],
        }
    }

    fn of_kind(kind: DeviceKind) -> Option<Self> {
        match kind {
            DeviceKind::Dasd => Some(Self::Dasd),
            DeviceKind::Multipath => Some(Self::Multipath),
            DeviceKind::BiosRaid | DeviceKind::SoftwareRaid => Some(Self::Raid),
            DeviceKind::LvmVg | DeviceKind::LvmPv | DeviceKind::LvmLv => Some(Self::Lvm),
            DeviceKind::Nfs => Some(Self::Nfs),
            DeviceKind::Encryption => Some(Self::Encryption),
            DeviceKind::Disk | DeviceKind::Partition | DeviceKind::XenPartition => None,
        }
    }

    fn of_filesystem(fs_type: FileSystemType) -> Option<Self> {
        match fs_type {
            FileSystemType::Btrfs => Some(Self::Btrfs),
            FileSystemType::Xfs => Some(Self::Xfs),
            FileSystemType::Ext2 | FileSystemType::Ext3 | FileSystemType::Ext4 => Some(Self::Ext),
            FileSystemType::Vfat => Some(Self::Vfat),
            FileSystemType::Ntfs => Some(Self::Ntfs),
            FileSystemType::Nfs => Some(Self::Nfs),
            FileSystemType::Swap | FileSystemType::Tmpfs => None,
        }
    }

    /// Returns the features a single device relies on.
    fn of_device(device: &Device) -> impl Iterator<Item = Self> {
        Self::of_kind(device.kind).into_iter().chain(
            device
                .filesystem
                .as_ref()
                .and_then(|fs| Self::of_filesystem(fs.fs_type)),
        )
    }
}

/// The storage features in use by a device graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedStorageFeatures {
    features: BTreeSet<StorageFeature>,
}

impl UsedStorageFeatures {
    pub fn new(graph: &DeviceGraph) -> Self {
        let features = graph
            .devices()
            .flat_map(StorageFeature::of_device)
            .collect::<BTreeSet<_>>();
        trace!(
            "Storage features in use: {}",
            features
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
        Self { features }
    }

    pub fn features(&self) -> &BTreeSet<StorageFeature> {
        &self.features
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Returns the packages needed by all the features in use.
    pub fn feature_packages(&self) -> BTreeSet<String> {
        self.features
            .iter()
            .flat_map(|feature| feature.packages())
            .map(|package| package.to_string())
            .collect()
    }
}
