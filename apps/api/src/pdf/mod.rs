//! PDF template drivers.
//!
//! Layout is single-pass and greedy over a [`cursor::PageCursor`]. The byte
//! stream is serialized once, after all drawing is complete.

pub mod canvas;
pub mod cover_letter;
pub mod cursor;
pub mod links;
pub mod resume;
pub mod sections;

pub use cover_letter::render_cover_letter;
pub use resume::render_resume;
