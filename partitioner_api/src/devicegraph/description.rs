use std::path::Path;

use anyhow::{Context, Error};
use serde::{Deserialize, Serialize};

use crate::DeviceName;

use super::{
    builder::DeviceGraphBuilder, device::FileSystem, error::DeviceGraphBuildError,
    graph::DeviceGraph, types::DeviceKind,
};

/// Serializable description of a whole device graph.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DeviceGraphDescription {
    /// All devices, in discovery order.
    #[serde(default)]
    pub devices: Vec<DeviceDescription>,
}

/// Serializable description of a single device and the devices it refers to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DeviceDescription {
    /// Name of the device. Must be unique across the graph.
    pub name: DeviceName,

    /// Kind of the device.
    pub kind: DeviceKind,

    /// Size of the device in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Names of the direct members of this device, when it is a container
    /// (multipath, RAID, volume group).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<DeviceName>,

    /// Name of the device this one is derived from (e.g. the disk of a
    /// partition or the volume group of a logical volume).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<DeviceName>,

    /// Name of the device this one sits on top of (e.g. the partition used by
    /// a physical volume).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backing: Option<DeviceName>,

    /// Filesystem placed directly on the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filesystem: Option<FileSystem>,
}

impl DeviceGraphDescription {
    /// Parses a description from a YAML string.
    pub fn from_yaml(contents: &str) -> Result<Self, Error> {
        serde_yaml::from_str(contents).context("Failed to parse device graph description")
    }

    /// Reads and parses a description from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read device graph description: {}",
                path.as_ref().display()
            )
        })?;
        Self::from_yaml(&contents)
    }

    /// Builds the device graph described by this description.
    pub fn build(self) -> Result<DeviceGraph, DeviceGraphBuildError> {
        let mut builder = DeviceGraphBuilder::default();
        self.devices
            .into_iter()
            .for_each(|device| builder.add_device(device));
        builder.build()
    }
}

impl DeviceDescription {
    /// Creates a description of a device without relations.
    pub fn new(name: impl Into<DeviceName>, kind: DeviceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            size: None,
            members: Vec::new(),
            parent: None,
            backing: None,
            filesystem: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    use crate::devicegraph::device::FileSystemType;

    #[test]
    fn test_parse() {
        let description = DeviceGraphDescription::from_yaml(indoc! {r#"
            devices:
              - name: /dev/sda
                kind: disk
                size: 1073741824
              - name: /dev/sda1
                kind: partition
                parent: /dev/sda
                filesystem:
                  type: ext4
                  mount-point: /
        "#})
        .unwrap();

        assert_eq!(description.devices.len(), 2);
        assert_eq!(description.devices[0].size, Some(1073741824));
        assert_eq!(description.devices[1].parent.as_deref(), Some("/dev/sda"));
        assert_eq!(
            description.devices[1].filesystem,
            Some(FileSystem {
                fs_type: FileSystemType::Ext4,
                mount_point: Some("/".into()),
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        // Unknown kind
        DeviceGraphDescription::from_yaml(indoc! {r#"
            devices:
              - name: /dev/sda
                kind: floppy
        "#})
        .unwrap_err();

        // Unknown field
        DeviceGraphDescription::from_yaml(indoc! {r#"
            devices:
              - name: /dev/sda
                kind: disk
                color: blue
        "#})
        .unwrap_err();
    }

    #[test]
    fn test_empty() {
        let graph = DeviceGraphDescription::from_yaml("{}")
            .unwrap()
            .build()
            .unwrap();
        assert!(graph.is_empty());
    }
}
