use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised while talking to the weather API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WeatherError {
    #[error("OpenWeather API key is missing")]
    MissingCredential,

    #[error("API error: {status} - {body}")]
    Upstream { status: u16, body: String },

    #[error("transport error: {cause}")]
    Transport { cause: String },

    #[error("unknown city: {0}")]
    UnknownLocation(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Copyable discriminant of [`WeatherError`], kept in the view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MissingCredential,
    Upstream,
    Transport,
    UnknownLocation,
    Decode,
}

impl WeatherError {
    pub fn kind(&self) -> FailureKind {
        match self {
            WeatherError::MissingCredential => FailureKind::MissingCredential,
            WeatherError::Upstream { .. } => FailureKind::Upstream,
            WeatherError::Transport { .. } => FailureKind::Transport,
            WeatherError::UnknownLocation(_) => FailureKind::UnknownLocation,
            WeatherError::Decode(_) => FailureKind::Decode,
        }
    }

    pub fn is_missing_credential(&self) -> bool {
        matches!(self, WeatherError::MissingCredential)
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Transport {
            cause: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(WeatherError::MissingCredential.kind(), FailureKind::MissingCredential);
        assert_eq!(
            WeatherError::Upstream { status: 401, body: "nope".into() }.kind(),
            FailureKind::Upstream
        );
        assert_eq!(
            WeatherError::Transport { cause: "reset".into() }.kind(),
            FailureKind::Transport
        );
    }

    #[test]
    fn upstream_message_carries_status_and_body() {
        let err = WeatherError::Upstream {
            status: 401,
            body: "Invalid API key".into(),
        };
        assert_eq!(err.to_string(), "API error: 401 - Invalid API key");
    }
}
