//! WOLfes Configuration Compiler
//!
//! Front end of the WOLfes code generator: reads a declarative configuration
//! document describing apps made of nodes (timers, topic publishers and
//! subscribers, service servers and clients) and compiles it into a
//! validated intermediate representation for the generator back ends.
//!
//! ## Pipeline
//!
//! ```text
//! path ──► reader ──► decoder ──► IrBuilder ──► IrValidator ──► Ir
//!          (~, size)  (// lines)   (fields,       (version
//!                                   identifiers)   allow-list)
//! ```
//!
//! ## Document
//!
//! ```text
//! // comment lines are allowed
//! {
//!     "wolfes_version": "0.7.0",
//!     "platform": 0,
//!     "lang": 0,
//!     "apps": [{
//!         "namespace": "demo",
//!         "protocol_type": 0,
//!         "nodes": [{
//!             "classname": "DemoNode",
//!             "timers": [{ "type": 0, "period": 100 }]
//!         }]
//!     }]
//! }
//! ```

pub mod builder;
pub mod compiler;
pub mod config;
pub mod decoder;
pub mod diagnostics;
pub mod error;
pub mod ident;
pub mod ir;
pub mod location;
pub mod reader;
pub mod validator;
pub mod version;

pub use builder::{EntityKind, IrBuilder};
pub use compiler::Compiler;
pub use config::{OutputFormat, ToolConfig};
pub use diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics, Severity};
pub use error::{CompileError, ErrorCode, Result};
pub use ident::{is_valid_identifier, IdentifierRegistry};
pub use ir::Ir;
pub use location::Location;
pub use validator::IrValidator;
pub use version::{Version, SUPPORTED_VERSIONS};
