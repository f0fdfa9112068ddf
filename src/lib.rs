//! Re-encode PNG/JPEG images as WebP and WebP images as PNG.
//!
//! The conversion itself is delegated to the `image` and `webp` crates; this
//! library decides what to convert, where to write it, and how failures are
//! reported.

pub mod batch;
pub mod convert;
pub mod error;
pub mod format;
pub mod quality;
pub mod utils;

pub use batch::{convert_folder, BatchOptions, BatchSummary};
pub use convert::{convert_file, ConversionRequest, ConversionResult, ConversionSettings};
pub use error::{BatchError, ConvertError};
pub use format::{classify, ImageKind};
pub use quality::Quality;
