//! IES LM-63 photometric data support.
//!
//! This module parses LM-63 text documents into an immutable [`IesRecord`]
//! and answers the queries renderers need (nearest plane, unit conversion).
//!
//! ## Supported
//!
//! - LM-63-1995 / 2002 / 2019 documents (the version line is kept verbatim)
//! - Keyword section, repeated keys joined with newlines
//! - `TILT=NONE`, `TILT=<file>`, and `TILT=INCLUDE` (block skipped)
//! - Angle and candela values spread over any number of lines
//!
//! ## Not Supported
//!
//! - Interpreting tilt multiplier data
//! - Resolving external `.tlt` files
//! - Checking physical plausibility of candela values
//!
//! # Example
//!
//! ```ignore
//! use lux_core::ies::{IesRecord, IntensityMode};
//!
//! let ies = IesRecord::parse(&content)?;
//! let plane = ies.plane(90.0);
//! let peak = ies.value(ies.properties().peak_value, IntensityMode::Candela)?;
//! ```

mod builder;
mod derive;
mod lines;
mod parser;
mod query;
mod types;

pub use parser::{parse_ies, IesParser, ParseError, ParseOptions, ParseResult, Section};
pub use query::{IntensityMode, QueryError, QueryResult};
pub use types::*;
