//! Turns chat message text into a typed [`Command`].
//!
//! The grammar is token based and forgiving about filler words:
//!
//! ```text
//! /list | /lst
//! /exchange [$]<amount> ... <currency>        e.g. /exchange $10 to CAD
//! /history <BASE>/<QUOTE> ... <days> <word>   e.g. /history USD/CAD for 7 days
//! /help | /start
//! ```
//!
//! A `@botname` suffix on the command word is ignored.

use crate::core::error::{BotError, CommandKind, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Exchange {
        amount: f64,
        currency: String,
    },
    History {
        base: String,
        quote: String,
        days: u32,
        /// The user's text after the command word, used as the chart title.
        title: String,
    },
    Help,
    /// Anything that is not a known command.
    Invalid(String),
}

pub fn parse_command(text: &str) -> Result<Command> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let Some(head) = tokens.first() else {
        return Ok(Command::Invalid(String::new()));
    };
    let Some(name) = head.strip_prefix('/') else {
        return Ok(Command::Invalid(head.to_string()));
    };
    let name = name.split('@').next().unwrap_or_default().to_lowercase();

    match name.as_str() {
        "list" | "lst" => Ok(Command::List),
        "help" | "start" => Ok(Command::Help),
        "exchange" => parse_exchange(&tokens),
        "history" => parse_history(&tokens),
        _ => Ok(Command::Invalid(head.to_string())),
    }
}

fn parse_exchange(tokens: &[&str]) -> Result<Command> {
    let command = CommandKind::Exchange;
    if tokens.len() < 3 {
        return Err(BotError::Syntax { command });
    }

    let raw_amount = tokens[1];
    let amount = raw_amount
        .strip_prefix('$')
        .unwrap_or(raw_amount)
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite() && *a >= 0.0)
        .ok_or_else(|| BotError::Input {
            command,
            field: "amount",
            value: raw_amount.to_string(),
        })?;

    let currency = tokens[tokens.len() - 1].to_uppercase();
    Ok(Command::Exchange { amount, currency })
}

fn parse_history(tokens: &[&str]) -> Result<Command> {
    let command = CommandKind::History;
    if tokens.len() < 4 {
        return Err(BotError::Syntax { command });
    }

    let (base, quote) = match tokens[1].split('/').collect::<Vec<_>>().as_slice() {
        [base, quote] if !base.is_empty() && !quote.is_empty() => {
            (base.to_uppercase(), quote.to_uppercase())
        }
        _ => return Err(BotError::Syntax { command }),
    };

    let raw_days = tokens[tokens.len() - 2];
    let days = raw_days.parse::<u32>().map_err(|_| BotError::Input {
        command,
        field: "period",
        value: raw_days.to_string(),
    })?;

    Ok(Command::History {
        base,
        quote,
        days,
        title: tokens[1..].join(" "),
    })
}
