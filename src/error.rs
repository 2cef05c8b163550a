//! Unified error type for imagegen.

use thiserror::Error;

use crate::provider::Provider;

/// Errors that can occur while generating an image.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A network provider was selected without an API key.
    #[error("Please provide {provider} API key. Set {env_var}, pass --api-key or add it to config file.")]
    MissingCredential {
        /// The provider that needs the key.
        provider: Provider,
        /// Environment variable the key can be read from.
        env_var: &'static str,
    },

    /// The provider identifier did not match any known provider.
    #[error("Unknown API provider '{0}'")]
    UnknownProvider(String),

    /// A provider answered with a non-success status.
    #[error("{provider} API error ({status}): {body}")]
    Api {
        /// The provider that answered.
        provider: Provider,
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A response could not be decoded into an image.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// A failure on the `OpenAI` path, reworded by [`Guidance`].
    #[cfg_attr(not(feature = "openai"), allow(dead_code))]
    #[error("{}", .guidance.openai_message(.message))]
    OpenAi {
        /// How the failure was classified.
        guidance: Guidance,
        /// The underlying failure text.
        message: String,
        /// The failure as the adapter raised it.
        #[source]
        source: Box<GenerateError>,
    },

    /// The provider's client was not compiled into this build.
    #[error("{0} client is not available in this build (enable the `openai` feature)")]
    LibraryUnavailable(Provider),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image could not be encoded for output.
    #[error("Image encoding error: {0}")]
    Encoding(String),
}

/// Remediation category derived from a failure message.
#[cfg_attr(not(feature = "openai"), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guidance {
    /// The account has run out of credit or hit a billing limit.
    Billing,
    /// The API key was rejected.
    InvalidKey,
    /// Anything else.
    Generic,
}

impl Guidance {
    /// Classify a failure message by substring, ignoring case.
    ///
    /// `"billing"` wins over `"invalid"` + `"api"`.
    #[must_use]
    #[cfg_attr(not(feature = "openai"), allow(dead_code))]
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("billing") {
            Self::Billing
        } else if lower.contains("invalid") && lower.contains("api") {
            Self::InvalidKey
        } else {
            Self::Generic
        }
    }

    /// The user-facing message for an `OpenAI` failure of this kind.
    #[must_use]
    pub fn openai_message(self, detail: &str) -> String {
        match self {
            Self::Billing => "OpenAI API Error: Please check your billing and credits at \
                              https://platform.openai.com/account/billing"
                .to_string(),
            Self::InvalidKey => "Invalid API Key. Please check your OpenAI API key at \
                                 https://platform.openai.com/api-keys"
                .to_string(),
            Self::Generic => format!("OpenAI API Error: {detail}"),
        }
    }

    /// A follow-up hint to print after the error, if any.
    #[must_use]
    pub fn hint(self) -> Option<&'static str> {
        match self {
            Self::Billing => {
                Some("Check your account billing: https://platform.openai.com/account/billing")
            }
            Self::InvalidKey => Some("Verify your API key: https://platform.openai.com/api-keys"),
            Self::Generic => None,
        }
    }
}

impl GenerateError {
    /// Remediation category. Only `OpenAI` failures are classified; the
    /// hints point at the `OpenAI` dashboard.
    #[must_use]
    pub fn guidance(&self) -> Guidance {
        match self {
            Self::OpenAi { guidance, .. } => *guidance,
            _ => Guidance::Generic,
        }
    }

    /// Follow-up line the CLI prints after the error, if any.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        self.guidance().hint()
    }

    /// The most specific failure kind, looking through the `OpenAI` wrapper.
    #[must_use]
    pub fn underlying(&self) -> &Self {
        match self {
            Self::OpenAi { source, .. } => source.underlying(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_any_case() {
        assert_eq!(Guidance::classify("Billing hard limit has been reached"), Guidance::Billing);
        assert_eq!(Guidance::classify("check BILLING details"), Guidance::Billing);
    }

    #[test]
    fn invalid_api_key() {
        assert_eq!(Guidance::classify("Invalid API key provided: sk-***"), Guidance::InvalidKey);
    }

    #[test]
    fn invalid_without_api_is_generic() {
        assert_eq!(Guidance::classify("invalid size parameter"), Guidance::Generic);
    }

    #[test]
    fn billing_takes_precedence() {
        assert_eq!(Guidance::classify("invalid api billing state"), Guidance::Billing);
    }

    #[test]
    fn other_failures_are_generic() {
        assert_eq!(Guidance::classify("Rate limit exceeded"), Guidance::Generic);
        assert!(Guidance::Generic.hint().is_none());
    }

    fn classified(guidance: Guidance, message: &str) -> GenerateError {
        GenerateError::OpenAi {
            guidance,
            message: message.to_string(),
            source: Box::new(GenerateError::Decoding(message.to_string())),
        }
    }

    #[test]
    fn openai_messages() {
        let billing = classified(Guidance::Billing, "whatever");
        assert!(billing.to_string().contains("account/billing"));

        let key = classified(Guidance::InvalidKey, "");
        assert!(key.to_string().starts_with("Invalid API Key."));

        let generic = classified(Guidance::Generic, "boom");
        assert_eq!(generic.to_string(), "OpenAI API Error: boom");
    }

    #[test]
    fn openai_failure_keeps_its_kind() {
        let err = GenerateError::OpenAi {
            guidance: Guidance::Generic,
            message: "Error code: 404 - gone".into(),
            source: Box::new(GenerateError::Api {
                provider: Provider::OpenAi,
                status: 404,
                body: "gone".into(),
            }),
        };

        assert!(matches!(err.underlying(), GenerateError::Api { status: 404, .. }));
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.to_string().contains("(404)"));
    }

    #[test]
    fn underlying_of_plain_error_is_itself() {
        let err = GenerateError::Decoding("bad bytes".into());
        assert!(matches!(err.underlying(), GenerateError::Decoding(_)));
    }

    #[test]
    fn other_providers_get_no_openai_hint() {
        let err = GenerateError::Api {
            provider: Provider::Stability,
            status: 401,
            body: "Invalid API key".into(),
        };
        assert_eq!(err.guidance(), Guidance::Generic);
        assert!(err.hint().is_none());

        let openai = classified(Guidance::InvalidKey, "Invalid API key");
        assert_eq!(openai.hint(), Some("Verify your API key: https://platform.openai.com/api-keys"));
    }

    #[test]
    fn missing_credential_message() {
        let err = GenerateError::MissingCredential {
            provider: Provider::HuggingFace,
            env_var: "HUGGINGFACE_API_KEY",
        };
        let text = err.to_string();
        assert!(text.starts_with("Please provide Hugging Face API key"));
        assert!(text.contains("HUGGINGFACE_API_KEY"));
    }
}
