//! Lux Core - IES photometric data parsing.
//!
//! This crate provides:
//!
//! - **IES support**: LM-63 parsing into an immutable `IesRecord`
//! - **Queries**: nearest horizontal plane, candela and cd/klm conversion
//! - **Batch parsing**: many documents at once, in parallel
//!
//! Reading files is left to the caller; everything here works on text.
//!
//! # Example
//!
//! ```ignore
//! use lux_core::ies::IesRecord;
//!
//! let content = std::fs::read_to_string("luminaire.ies")?;
//! let ies = IesRecord::parse(&content)?;
//! println!("{} planes, peak {} cd",
//!     ies.properties().total_horizontal_angles,
//!     ies.properties().peak_value);
//! ```

pub mod batch;
pub mod ies;

// Re-export commonly used types
pub use batch::{parse_batch, BatchInput, BatchOptions, BatchOutput, BatchStats};
pub use ies::{parse_ies, IesRecord, IntensityMode, ParseError, ParseOptions, QueryError};
