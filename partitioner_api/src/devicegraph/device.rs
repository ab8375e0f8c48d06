use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, IntoStaticStr};

use crate::{constants::ROOT_MOUNT_POINT_PATH, DeviceName, DeviceSid};

use super::types::DeviceKind;

/// A device of the graph.
///
/// Devices are plain values; the graph owns them and callers get references
/// or clones. Identity is given by the storage id together with the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Storage id, unique within the graph the device belongs to.
    pub sid: DeviceSid,

    /// Name of the device, e.g. `/dev/sda`, `vg0` or `server:/export`.
    pub name: DeviceName,

    /// Kind of the device.
    pub kind: DeviceKind,

    /// Size in bytes, when known.
    pub size: Option<u64>,

    /// Filesystem placed directly on the device, if any.
    pub filesystem: Option<FileSystem>,
}

impl Device {
    /// Returns whether `other` is the very same device.
    pub fn is(&self, other: &Device) -> bool {
        self.sid == other.sid && self.name == other.name
    }

    /// Returns whether the device holds a filesystem mounted at the given
    /// path.
    pub fn is_mounted_at(&self, path: impl AsRef<Path>) -> bool {
        self.filesystem
            .as_ref()
            .and_then(|fs| fs.mount_point.as_deref())
            .is_some_and(|mp| mp == path.as_ref())
    }

    /// Returns whether the device holds the root filesystem.
    pub fn is_root(&self) -> bool {
        self.is_mounted_at(ROOT_MOUNT_POINT_PATH)
    }

    /// Returns a user friendly description of the device suitable for
    /// logging, e.g. `disk '/dev/sda'`.
    pub fn describe(&self) -> String {
        format!("{} '{}'", self.kind, self.name)
    }
}

/// A filesystem on top of a device.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSystem {
    /// Type of the filesystem.
    #[serde(rename = "type")]
    pub fs_type: FileSystemType,

    /// Where the filesystem is mounted, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_point: Option<PathBuf>,
}

/// Supported filesystem types.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FileSystemType {
    Btrfs,
    Ext2,
    Ext3,
    Ext4,
    Xfs,
    Vfat,
    Ntfs,
    Swap,
    Nfs,
    Tmpfs,
}

impl FileSystemType {
    /// Returns whether the type is used for swap space.
    pub fn is_swap(&self) -> bool {
        matches!(self, Self::Swap)
    }
}
