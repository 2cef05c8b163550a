//! Provider identifiers and their credential requirements.

use std::fmt;
use std::str::FromStr;

use crate::error::GenerateError;

/// Supported image providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Flat-colour stand-in with an artificial delay.
    Demo,
    /// Local gradient image with the prompt drawn on it.
    Placeholder,
    /// Hugging Face Inference API (Stable Diffusion XL).
    HuggingFace,
    /// `OpenAI` DALL-E 3.
    OpenAi,
    /// Stability AI REST API.
    Stability,
}

/// Identifier aliases accepted on the command line and in config.
const ALIASES: &[(&str, Provider)] = &[
    ("demo", Provider::Demo),
    ("demo-mode", Provider::Demo),
    ("placeholder", Provider::Placeholder),
    ("huggingface", Provider::HuggingFace),
    ("hugging-face", Provider::HuggingFace),
    ("hf", Provider::HuggingFace),
    ("openai", Provider::OpenAi),
    ("openai-dall-e", Provider::OpenAi),
    ("dall-e", Provider::OpenAi),
    ("dalle", Provider::OpenAi),
    ("stability", Provider::Stability),
    ("stability-ai", Provider::Stability),
];

impl Provider {
    /// Whether requests to this provider need an API key.
    #[must_use]
    pub fn requires_credential(self) -> bool {
        !matches!(self, Self::Demo | Self::Placeholder)
    }

    /// Environment variable holding this provider's API key.
    #[must_use]
    pub fn env_var(self) -> Option<&'static str> {
        match self {
            Self::HuggingFace => Some("HUGGINGFACE_API_KEY"),
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Stability => Some("STABILITY_API_KEY"),
            Self::Demo | Self::Placeholder => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Demo => "Demo",
            Self::Placeholder => "Placeholder",
            Self::HuggingFace => "Hugging Face",
            Self::OpenAi => "OpenAI",
            Self::Stability => "Stability AI",
        };
        f.write_str(name)
    }
}

impl FromStr for Provider {
    type Err = GenerateError;

    /// Resolve a provider identifier, ignoring case and surrounding spaces.
    /// Spaces and underscores inside the name count as hyphens.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_lowercase().replace([' ', '_'], "-");
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == normalized)
            .map(|&(_, provider)| provider)
            .ok_or_else(|| GenerateError::UnknownProvider(name.to_string()))
    }
}
