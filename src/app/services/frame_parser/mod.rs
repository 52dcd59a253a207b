//! Frame parser for USB-WDE1 receiver lines
//!
//! Turns one `;`-separated ASCII frame into a [`Reading`](crate::Reading).
//! The receiver writes decimals with a comma and leaves unused probe slots
//! blank, so every numeric field goes through a normalization step before
//! it lands in the fixed-shape reading.
//!
//! ## Architecture
//!
//! - [`parser`] - Frame splitting, shape validation and reading assembly
//! - [`field_map`] - Declarative table of field positions and their targets
//! - [`field_parsers`] - Decimal, count and flag conversion of single fields
//!
//! ## Usage
//!
//! ```rust
//! use usbwde::FrameParser;
//!
//! # fn example() -> usbwde::Result<()> {
//! let parser = FrameParser::default();
//! let frame = b"$1;1;;21,1;21,2;20,8;18,4;21,6;21,2;20,8;;47;46;46;44;50;49;46;;3,1;30;8,0;455;1;0\r\n";
//! let reading = parser.parse(frame)?;
//!
//! assert_eq!(reading.temperature()[0], 21.1);
//! assert_eq!(reading.hybrid_sensor().precipitation_count, 455);
//! # Ok(())
//! # }
//! ```

pub mod field_map;
pub mod field_parsers;
pub mod parser;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use field_map::{FIELD_MAP, FieldSpec, FieldTarget, ParseKind};
pub use field_parsers::normalize;
pub use parser::FrameParser;
