//! Core types and traits for scantray.
//!
//! This crate provides the fundamental data structures used throughout
//! the scantray ecosystem: session configuration, lifecycle status,
//! barcode symbologies, collected-code entries, and the error taxonomy.

mod code;
mod config;
mod error;
mod status;
mod symbology;

pub use code::{CodeEntry, CodeSource};
pub use config::{
    DetectorConfig, DetectorConfigBuilder, SessionConfig, SessionConfigBuilder,
};
pub use error::{AcquisitionError, SessionError, ValidationError};
pub use status::SessionStatus;
pub use symbology::{Facing, Symbology};
