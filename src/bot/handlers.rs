//! Command logic that does not touch the network: formatting listings,
//! converting amounts and shaping history into a chart.

use crate::chart::RateChart;
use crate::core::error::{BotError, CommandKind, Result};
use crate::core::rates::{
    BASE_CURRENCY, RateHistory, RateSnapshot, format_number, history_series, round2,
};
use chrono::{DateTime, Days, NaiveDate};

pub const HELP_TEXT: &str = "Available commands:\n\
/list or /lst - show available rates\n\
/exchange [$usd_amount | usd_amount USD] to [currency] - convert a USD amount to another currency\n\
/history [first_currency]/[second_currency] for [number of] days - chart the exchange rate for the recent period\n\
/help - show this message";

pub const UNKNOWN_COMMAND_TEXT: &str = "Unknown command. Send /help to see what I can do.";

pub fn format_rate_list(rates: &RateSnapshot) -> String {
    let mut rows = vec![format!(
        "Available rates for {BASE_CURRENCY} as base currency:"
    )];
    rows.extend(
        rates
            .iter()
            .map(|(currency, rate)| format!("{}: {}", currency, format_number(round2(*rate)))),
    );
    rows.join("\n")
}

/// `amount` USD in `currency`, rounded once at the end.
pub fn convert(amount: f64, currency: &str, rates: &RateSnapshot) -> Result<f64> {
    let rate = match rates.get(currency) {
        Some(rate) => *rate,
        None if currency == BASE_CURRENCY => 1.0,
        None => return Err(BotError::CurrencyNotFound(currency.to_string())),
    };
    let converted = round2(amount * rate);
    if !converted.is_finite() {
        return Err(BotError::Input {
            command: CommandKind::Exchange,
            field: "amount",
            value: format_number(amount),
        });
    }
    Ok(converted)
}

pub fn format_exchange(amount: f64, currency: &str, converted: f64) -> String {
    format!(
        "{} {} is {} {}",
        format_number(amount),
        BASE_CURRENCY,
        format_number(converted),
        currency
    )
}

/// `[today - days, today]` where today is the UTC date of `request_time`.
pub fn history_range(request_time: i64, days: u32) -> Result<(NaiveDate, NaiveDate)> {
    let invalid = |value: String| BotError::Input {
        command: CommandKind::History,
        field: "period",
        value,
    };
    let end = DateTime::from_timestamp(request_time, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| invalid(format!("request time {request_time}")))?;
    let start = end
        .checked_sub_days(Days::new(u64::from(days)))
        .ok_or_else(|| invalid(days.to_string()))?;
    Ok((start, end))
}

pub fn history_chart(
    title: &str,
    base: &str,
    quote: &str,
    history: &RateHistory,
) -> Result<RateChart> {
    let points = history_series(history, quote);
    if points.is_empty() {
        return Err(BotError::NoData {
            base: base.to_string(),
            quote: quote.to_string(),
        });
    }
    Ok(RateChart {
        title: title.to_string(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn snapshot(pairs: &[(&str, f64)]) -> RateSnapshot {
        pairs.iter().map(|(c, r)| (c.to_string(), *r)).collect()
    }

    #[test]
    fn test_rate_list_rounds_each_rate() {
        let text = format_rate_list(&snapshot(&[("JPY", 151.256), ("EUR", 0.9234)]));
        assert_eq!(
            text,
            "Available rates for USD as base currency:\nEUR: 0.92\nJPY: 151.26"
        );
    }

    #[test]
    fn test_rate_list_empty_snapshot() {
        assert_eq!(
            format_rate_list(&RateSnapshot::new()),
            "Available rates for USD as base currency:"
        );
    }

    #[test]
    fn test_convert_scenario() {
        let rates = snapshot(&[("EUR", 0.9), ("GBP", 0.8)]);
        let converted = convert(100.0, "EUR", &rates).unwrap();
        assert_eq!(format_exchange(100.0, "EUR", converted), "100.0 USD is 90.0 EUR");
    }

    #[test]
    fn test_convert_rounds_only_the_product() {
        // Rounding the rate first would give 3 * 1.24 = 3.72
        let rates = snapshot(&[("CAD", 1.236)]);
        assert_eq!(convert(3.0, "CAD", &rates).unwrap(), 3.71);
        assert_eq!(convert(12.5, "CAD", &rates).unwrap(), round2(12.5 * 1.236));
    }

    #[test]
    fn test_convert_unknown_currency() {
        let result = convert(50.0, "XYZ", &RateSnapshot::new());
        assert!(matches!(result, Err(BotError::CurrencyNotFound(c)) if c == "XYZ"));
    }

    #[test]
    fn test_convert_rejects_overflowing_amount() {
        let rates = snapshot(&[("JPY", 151.25)]);
        let result = convert(1e307, "JPY", &rates);
        assert!(matches!(
            result,
            Err(BotError::Input {
                command: CommandKind::Exchange,
                ..
            })
        ));
        // The product fits but scaling it for rounding does not
        let result = convert(1e307, "USD", &rates);
        assert!(matches!(
            result,
            Err(BotError::Input {
                command: CommandKind::Exchange,
                ..
            })
        ));
    }

    #[test]
    fn test_convert_usd_without_explicit_rate() {
        assert_eq!(convert(7.5, "USD", &RateSnapshot::new()).unwrap(), 7.5);
    }

    #[test]
    fn test_history_range() {
        // 2024-03-05T12:00:00Z
        let (start, end) = history_range(1709640000, 7).unwrap();
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 27).unwrap());

        let (start, end) = history_range(1709640000, 0).unwrap();
        assert_eq!(start, end);
    }

    #[test]
    fn test_history_chart_requires_data() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let mut history = RateHistory::new();
        history.insert(day, BTreeMap::from([("CAD".to_string(), 1.35)]));

        let chart = history_chart("USD/CAD for 0 days", "USD", "CAD", &history).unwrap();
        assert_eq!(chart.points, vec![(day, 1.35)]);
        assert_eq!(chart.title, "USD/CAD for 0 days");

        let result = history_chart("USD/EUR for 0 days", "USD", "EUR", &history);
        assert!(matches!(result, Err(BotError::NoData { .. })));
    }
}
