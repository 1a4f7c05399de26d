//! Budget amounts: validation, form-input parsing and the display label.

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

pub const NOT_SPECIFIED: &str = "not specified";

/// Render an optional budget range for listings.
pub fn format_range(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (None, None) => NOT_SPECIFIED.to_string(),
        (Some(min), Some(max)) => format!("{}–{}", format_amount(min), format_amount(max)),
        (Some(min), None) => format!("from {}", format_amount(min)),
        (None, Some(max)) => format!("up to {}", format_amount(max)),
    }
}

/// Thousands-separated amount; values that are whole at cent precision drop the
/// decimals.
pub fn format_amount(amount: f64) -> String {
    let cents = (amount * 100.0).round() / 100.0;
    let rendered = if cents.fract() == 0.0 {
        format!("{cents:.0}")
    } else {
        format!("{cents:.2}")
    };

    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Amount as submitted: form posts send text, API clients a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    pub fn resolve(&self, field: &'static str) -> Result<Option<f64>, ValidationError> {
        match self {
            AmountInput::Number(value) => validate_amount(field, Some(*value)),
            AmountInput::Text(raw) => parse_amount(field, raw),
        }
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

/// Parse form-style amount input. Blank input means "no amount".
pub fn parse_amount(field: &'static str, raw: &str) -> Result<Option<f64>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value = trimmed
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidAmount {
            field,
            raw: raw.to_string(),
        })?;
    validate_amount(field, Some(value))
}

pub(crate) fn validate_amount(
    field: &'static str,
    amount: Option<f64>,
) -> Result<Option<f64>, ValidationError> {
    match amount {
        None => Ok(None),
        Some(value) if !value.is_finite() => Err(ValidationError::InvalidAmount {
            field,
            raw: value.to_string(),
        }),
        Some(value) if value < 0.0 => Err(ValidationError::NegativeAmount { field, value }),
        Some(value) => Ok(Some(value)),
    }
}
