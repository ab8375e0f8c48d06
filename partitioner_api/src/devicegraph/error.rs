use serde::{Deserialize, Serialize};

use super::{device::FileSystemType, types::DeviceKind};

#[derive(thiserror::Error, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceGraphBuildError {
    #[error("Device '{0}' is defined more than once")]
    DuplicateDeviceName(String),

    #[error("A device of kind '{0}' has an empty name")]
    EmptyDeviceName(DeviceKind),

    #[error("Device '{name}' of kind '{kind}' cannot hold a filesystem of type '{fs_type}'")]
    UnexpectedFilesystem {
        name: String,
        kind: DeviceKind,
        fs_type: FileSystemType,
    },
}
