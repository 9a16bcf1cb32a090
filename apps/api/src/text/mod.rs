//! Text preparation shared by every output format: sanitizing, encoding,
//! measuring and wrapping.

pub mod metrics;
pub mod sanitize;
pub mod winansi;
pub mod wrap;

pub use metrics::{FontFamily, StandardFont};
pub use sanitize::{sanitize, sanitize_for_font};
pub use wrap::{wrap_chars, wrap_text};
