//! Language model clients and abstractions.

pub mod client;
pub mod openai;

pub use client::{GenerationOutput, LanguageModel};
pub use openai::OpenAIChatModel;
