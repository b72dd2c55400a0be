//! This file is the root of the `sgmarshal` Rust crate.
//!
//! `sgmarshal` moves values across the boundary between a numerical scripting
//! runtime and a machine-learning toolkit. The runtime hands over
//! self-describing `DynamicValue`s; the toolkit wants flat, strongly-typed
//! buffers. The crate's responsibilities are strictly limited to:
//! 1.  Classifying incoming values into the closed set of `ElementKind`s.
//! 2.  Importing them into owned `TypedBuffer`s, sparse matrices and string
//!     lists, and exporting those back into host values.
//! 3.  Running one command per invocation behind a `Gateway` that turns every
//!     failure into a single `HostReport`.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod buffer;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod report;
pub mod session;
pub mod types;
pub mod value;

//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use buffer::{Shape, SparseEntry, SparseMatrix, SparseVector, StringList, StringRecord, TypedBuffer};
pub use config::MarshalConfig;
pub use error::MarshalError;
pub use gateway::{CommandHandler, Gateway, NoopRuntime, Outcome, Runtime};
pub use report::{HostReport, LogReporter, MemoryReporter, ReportKind, Reporter};
pub use session::{classify_value, ArgumentCursor, MarshalSession};
pub use types::{Char, Element, ElementKind, HostClass, StringElement};
pub use value::{DenseArray, DynamicValue, SparseArray, SparseValues};
