//! Error types for ReviewWatch
//!
//! User-facing messages are in Russian: every recoverable error ends up in the
//! Telegram chat as `Сбой в работе программы: <error>`.

use thiserror::Error;

/// Result type alias using ReviewWatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ReviewWatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// One or more required credentials are absent or empty
    #[error("{0}")]
    MissingCredentials(MissingCredentials),

    /// The review API could not be reached or answered with a non-200 status
    #[error("Эндпоинт {url} недоступен. {reason}")]
    EndpointUnavailable {
        /// Endpoint that was queried
        url: String,
        /// Status code or transport failure description
        reason: String,
    },

    /// The response body is not valid JSON
    #[error("Ошибка преобразования ответа API в JSON: {0}")]
    MalformedResponse(String),

    /// The response or one of its items does not have the expected shape
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// A homework record violates a business rule
    #[error(transparent)]
    Value(#[from] ValueError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an endpoint error for a non-success HTTP status
    pub fn endpoint_status(url: impl Into<String>, status: u16) -> Self {
        Self::EndpointUnavailable {
            url: url.into(),
            reason: format!("Код ответа API: {status}"),
        }
    }

    /// Create an endpoint error for a transport failure
    pub fn endpoint_transport(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::EndpointUnavailable {
            url: url.into(),
            reason: format!("Сбой при запросе к эндпоинту: {reason}"),
        }
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error must stop the process instead of being retried
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingCredentials(_) | Self::Config(_))
    }
}

/// Missing credential names, one message line per entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCredentials {
    /// Human-readable description of each missing value
    pub lines: Vec<String>,
}

impl std::fmt::Display for MissingCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Structural problems in the API payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Expected a JSON object
    #[error("{what} не является словарем")]
    NotAMapping {
        /// What was inspected
        what: &'static str,
    },

    /// A required top-level key is absent
    #[error("В ответе API отсутствует ключ \"{0}\"")]
    MissingKey(&'static str),

    /// A key is present but holds the wrong JSON type
    #[error("Значение по ключу \"{key}\" не является {expected}")]
    WrongType {
        /// Offending key
        key: &'static str,
        /// Expected type, already declined
        expected: &'static str,
    },

    /// A homework record lacks required keys
    #[error("В homework отсутствуют ключи: {}", .0.join(", "))]
    MissingItemKeys(Vec<&'static str>),
}

/// Business-rule violations inside a homework record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// `homework_name` is empty
    #[error("Название домашней работы с id={id} не указано")]
    EmptyName {
        /// The record's `id`, rendered as JSON
        id: String,
    },

    /// `status` is not one of the known verdicts
    #[error("Неожиданный статус домашней работы \"{0}\"")]
    UnknownStatus(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_endpoint_status_message_has_url_and_code() {
        let err = Error::endpoint_status("https://example.test/api/", 503);
        assert_eq!(
            err.to_string(),
            "Эндпоинт https://example.test/api/ недоступен. Код ответа API: 503"
        );
    }

    #[test]
    fn test_missing_credentials_one_line_each() {
        let err = Error::MissingCredentials(MissingCredentials {
            lines: vec!["a".to_string(), "b".to_string()],
        });
        assert_eq!(err.to_string(), "a\nb");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_shape_errors_are_recoverable() {
        let err: Error = ShapeError::MissingKey("homeworks").into();
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "В ответе API отсутствует ключ \"homeworks\"");
    }
}
