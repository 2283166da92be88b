pub mod import;
pub mod lesson;

pub use lesson::{Catalog, LessonFile, Sentence};
