//! LLM provider abstraction for railmate.
//!
//! Backends (Gemini, Groq, and a local rule-based stub) are exposed as
//! [`BackendHandle`]s listing the calling conventions they support.
//! [`ProviderResolver`] picks one from a preference with explicit fallback.

mod client;
mod google;
mod groq;
mod handle;
mod kind;
mod resolve;
mod stub;

#[allow(unused_imports)]
pub use handle::{
    BackendHandle, Capability, CompletionsClient, DirectCall, Generate, GenerateInput,
};
pub use kind::{preferred_provider, ProviderKind};
#[allow(unused_imports)]
pub use resolve::{BackendConstructor, ProviderResolver, Resolution};
pub use stub::LocalClassifier;
