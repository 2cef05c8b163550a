//! Live adapters that call third-party text-to-image APIs.

pub mod huggingface;
#[cfg(feature = "openai")]
pub mod openai;
pub mod stability;
