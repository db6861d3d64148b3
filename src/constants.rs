//! Centralized constants for railmate.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

use std::time::Duration;

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "railmate";

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "railmate.toml";

/// Readline history filename.
pub const HISTORY_FILENAME: &str = "chat_history.txt";

// --- Environment ---

/// Environment variable holding the Google Generative AI key.
pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Environment variable holding the Groq key.
pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";

/// Process-wide provider override.
pub const PROVIDER_OVERRIDE_VAR: &str = "LLM_PROVIDER";

// --- Provider defaults ---

/// Provider used when neither the caller nor the environment picks one.
pub const DEFAULT_PROVIDER: &str = "google";

/// Provider `llm_chat` asks for when the caller does not say otherwise.
pub const DEFAULT_CHAT_PROVIDER: &str = "groq";

/// Gemini model identifier.
pub const GOOGLE_MODEL: &str = "gemini-2.0-flash";

/// Sampling temperature for Gemini.
pub const GOOGLE_TEMPERATURE: f64 = 0.3;

/// Groq model identifier.
pub const GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Sampling temperature for Groq.
pub const GROQ_TEMPERATURE: f64 = 0.0;

/// Retries the Groq HTTP client performs internally on transient errors.
pub const GROQ_MAX_RETRIES: u32 = 3;

/// Base URL of Groq's OpenAI-compatible API.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Model name reported by the local stub backend.
pub const LOCAL_STUB_MODEL: &str = "local-rules";

/// Maximum tokens for LLM completions.
pub const MAX_TOKENS: u64 = 1024;

/// Timeout for a single HTTP request to a provider.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

// --- Invocation ---

/// Default number of attempts `llm_chat` makes.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Unit multiplied by `2^attempt` to get the backoff after a failed attempt.
pub const BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// Directory transcripts are written to unless configured otherwise.
pub const DEFAULT_TRANSCRIPT_DIR: &str = ".";

/// Filename prefix for transcript files.
pub const TRANSCRIPT_PREFIX: &str = "llm_transcript_";

/// UTC timestamp format embedded in transcript filenames.
pub const TRANSCRIPT_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

// --- Assistant ---

/// Instructions the planner sends as the system prompt.
pub const PLANNER_PROMPT: &str = "You are an IRCTC assistant.

Decide what action is needed based on the user's last message:
- search_trains
- check_availability
- cancellation_policy
- general_chat

Respond ONLY with one of these action names.";

/// Reply used when the message is not about trains.
pub const GENERAL_CHAT_REPLY: &str = "I can search trains between stations, \
check seat availability for a train number, and explain the cancellation policy.";

/// Route searched when the message does not name one.
pub const DEFAULT_ROUTE: (&str, &str) = ("Hyderabad", "Delhi");

/// Train number checked when the message does not name one.
pub const DEFAULT_TRAIN_NUMBER: &str = "12301";

// --- Server ---

/// Address `serve` binds to by default.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
