pub mod cover_letter;
pub mod document;
pub mod resume;

pub use cover_letter::CoverLetter;
pub use document::{ContactSegment, Document, DocumentKind, DocumentRow};
pub use resume::{ResumeData, Section, SectionBody};
