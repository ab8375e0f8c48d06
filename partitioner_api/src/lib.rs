pub mod constants;
pub mod devicegraph;
pub mod error;

/// Name of a device as known by the storage stack, e.g. `/dev/sda` or `vg0`.
pub type DeviceName = String;

/// Storage id of a device. Unique within a single device graph.
pub type DeviceSid = u32;
