// Skills: catalog vocabulary, resume → skill profile extraction, resume file loading.
// Pure functions only, except resume_text which touches the filesystem.

pub mod catalog;
pub mod extractor;
pub mod handlers;
pub mod resume_text;

pub use catalog::{contains_term, SkillCatalog};
pub use extractor::{extract_skills, SkillProfile};
pub use resume_text::{resume_text_from_bytes, resume_text_or_configured};
