//! Error taxonomy shared by the rate cache, the providers and the command
//! handlers.

use std::fmt::Display;
use thiserror::Error;

/// The command a parse error belongs to. Syntax and input errors read
/// differently depending on which command the user typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Exchange,
    History,
}

impl Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandKind::Exchange => write!(f, "/exchange"),
            CommandKind::History => write!(f, "/history"),
        }
    }
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error("malformed {command} command")]
    Syntax { command: CommandKind },

    #[error("invalid {field} for {command}: {value:?}")]
    Input {
        command: CommandKind,
        field: &'static str,
        value: String,
    },

    #[error("currency not found: {0}")]
    CurrencyNotFound(String),

    #[error("rate provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("no rates available for {base}/{quote}")]
    NoData { base: String, quote: String },

    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("chart rendering failed: {0}")]
    Render(String),
}

pub type Result<T, E = BotError> = std::result::Result<T, E>;

impl BotError {
    pub fn storage<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        BotError::Storage(err.into())
    }

    /// Errors caused by the operator's environment rather than by the
    /// user's input. These are logged loudly.
    pub fn is_internal(&self) -> bool {
        matches!(self, BotError::Storage(_) | BotError::Render(_))
    }

    /// The chat message shown to the user for this error.
    pub fn user_message(&self) -> &'static str {
        match self {
            BotError::Syntax {
                command: CommandKind::Exchange,
            } => "Incorrect input. Please, try again.",
            BotError::Syntax {
                command: CommandKind::History,
            } => "Incorrect base and second currencies. Please, try again.",
            BotError::Input {
                command: CommandKind::Exchange,
                ..
            } => "Incorrect USD amount. Please, try again.",
            BotError::Input {
                command: CommandKind::History,
                ..
            } => "Incorrect history period. Please, try again.",
            BotError::CurrencyNotFound(_) => "Second currency is not existing. Please, try again.",
            BotError::NoData { .. } => "No exchange rate is available for the selected currency.",
            BotError::ProviderUnavailable(_) => {
                "Exchange rate service is unavailable right now. Please, try again later."
            }
            BotError::Storage(_) | BotError::Render(_) => {
                "Something went wrong. Please, try again later."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_depend_on_command() {
        let exchange = BotError::Syntax {
            command: CommandKind::Exchange,
        };
        let history = BotError::Syntax {
            command: CommandKind::History,
        };
        assert_ne!(exchange.user_message(), history.user_message());
        assert_eq!(
            BotError::Input {
                command: CommandKind::History,
                field: "period",
                value: "ten".to_string(),
            }
            .user_message(),
            "Incorrect history period. Please, try again."
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = BotError::storage("disk on fire");
        assert!(err.is_internal());
        assert_eq!(err.to_string(), "storage error: disk on fire");
        assert!(!err.user_message().contains("disk"));

        assert!(!BotError::CurrencyNotFound("XYZ".to_string()).is_internal());
    }
}
