//! Prompt templates for every orchestration role.

pub mod template;

pub use template::PromptTemplate;
