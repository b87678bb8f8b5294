//! Query module
//!
//! Rule-based SQL synthesis from natural-language questions, plus the SQL
//! help responder.

pub mod help;
pub mod synthesizer;
pub mod types;

pub use types::{GeneratedQuery, HelpAnswer, SqlQuery, SAMPLE_QUESTIONS};
