//! # Device Graph
//!
//! The purpose of this module is to hold a snapshot of all storage devices in
//! a system and the relationships between them, and to answer the questions
//! the partitioner overview needs about it.
//!
//! In broad terms, this module is used as follows:
//!
//! 1. Parse a `DeviceGraphDescription` (usually from YAML).
//! 2. Feed its devices to a `DeviceGraphBuilder`, or simply call
//!    `DeviceGraphDescription::build()`.
//! 3. Query the resulting `DeviceGraph`: enumerate devices by kind, resolve
//!    members, children and backing devices.
//! 4. Use a `DeviceClassifier` to know which devices are grouped away under a
//!    container that owns their representation.
//!
//! The `checker` and `features` modules evaluate a graph: the former reports
//! setup problems, the latter the packages needed by the features in use.
//!
//! ## Layout
//!
//! ```text
//! partitioner_api/src/devicegraph
//! ├── builder.rs -----------> # DeviceGraphBuilder & core building logic.
//! ├── checker.rs -----------> # Setup correctness rules & findings.
//! ├── classifier.rs --------> # Grouped member detection.
//! ├── description.rs -------> # Serializable description of a graph.
//! ├── device.rs ------------> # Device & filesystem types.
//! ├── display.rs -----------> # Display implementations.
//! ├── error.rs -------------> # Error types.
//! ├── features.rs ----------> # Storage features in use & their packages.
//! ├── graph.rs -------------> # DeviceGraph.
//! ├── mod.rs ---------------> # This file.
//! └── types.rs -------------> # Kinds, relations & the classification table.
//! ```
//!

// Modules directly related to the graph and its building.
mod builder;
pub mod description;
pub mod device;
pub mod graph;
pub mod types;

// Graph evaluation.
pub mod checker;
pub mod classifier;
pub mod features;

// Implementations of fmt::Display for the types in this module.
pub mod display;

// Errors module.
pub mod error;

pub use builder::DeviceGraphBuilder;
pub use checker::{CheckReport, Finding, Severity, SetupChecker};
pub use classifier::DeviceClassifier;
pub use description::{DeviceDescription, DeviceGraphDescription};
pub use device::{Device, FileSystem, FileSystemType};
pub use features::{StorageFeature, UsedStorageFeatures};
pub use graph::DeviceGraph;
pub use types::{DeviceCategory, DeviceKind, DeviceKindFlag, Relation};
