//! Narrative generation: prompt building, the local template and the tier chain.

pub mod chain;
pub mod model;
pub mod prompt;
pub mod report;
pub mod template;

pub use chain::{LocalTemplateTier, NarrativeGenerator, NarrativeTier, PrimaryTier};
pub use model::{GenerationError, LanguageModel};
pub use prompt::{SYSTEM_PROMPT, build_prompt};
pub use report::{Report, ReportSource};
