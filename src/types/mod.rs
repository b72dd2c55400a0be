//! This module defines the core, strongly-typed descriptors shared by the
//! importer and the exporter.
//!
//! It includes the closed `ElementKind` enum handed to command handlers, the
//! `HostClass` tag carried by every host value, and the `Element` trait that
//! lets one generic routine serve every toolkit element type.

pub mod element;
pub mod element_kind;

// Re-export the main type(s) for easier access.
pub use element::{Char, Element, StringElement};
pub use element_kind::{ElementKind, HostClass};
