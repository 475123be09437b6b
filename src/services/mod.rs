//! 服务模块

pub mod affirmation;
pub mod generation;

pub use affirmation::{AffirmationSession, Clock, FixedClock, SubmissionOutcome, SystemClock};
pub use generation::{
    AFFIRMATION_PROMPT, GeminiModel, GenerationClient, GenerationError, LanguageModel,
    build_prompt,
};
