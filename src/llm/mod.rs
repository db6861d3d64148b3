//! The LLM invocation layer: one `llm_chat` entry point over whichever
//! backend the resolver hands out.

mod dispatch;
mod normalize;
mod retry;
mod transcript;


pub use dispatch::{ChatOptions, Dispatcher, InvocationResult};
pub use transcript::TranscriptStore;
