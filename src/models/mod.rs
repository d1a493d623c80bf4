pub mod record;
pub mod score;

pub use record::{AnswerSheet, GradeResult, StudentRecord};
pub use score::{Grade, Score};
