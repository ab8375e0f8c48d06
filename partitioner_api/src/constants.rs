/// Path of the root mount point.
pub const ROOT_MOUNT_POINT_PATH: &str = "/";

/// Default minimum size of the root filesystem, in bytes (5 GiB).
pub const DEFAULT_MIN_ROOT_SIZE: u64 = 5 * 1024 * 1024 * 1024;

/// Minimum number of members a software RAID needs to provide redundancy.
pub const MIN_RAID_MEMBERS: usize = 2;
