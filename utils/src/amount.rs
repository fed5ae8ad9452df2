//! Decimal display and parsing of token amounts.
//!
//! Amounts are stored as raw base units; humans read and write them with a
//! decimal point, e.g. `"20000.5"` for an 18-decimal token.

use motion_types::TokenAmount;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmountParseError {
    #[error("empty amount")]
    Empty,

    #[error("invalid digit in amount {0:?}")]
    InvalidDigit(String),

    #[error("amount {input:?} has more than {decimals} fractional digits")]
    TooPrecise { input: String, decimals: u8 },

    #[error("amount {0:?} overflows")]
    Overflow(String),
}

/// Render `amount` with `decimals` fractional digits, trailing zeros trimmed.
///
/// `format_amount(TokenAmount::from_tokens(5), 18, "MOTN")` gives `"5 MOTN"`.
/// An empty `symbol` yields the bare number.
pub fn format_amount(amount: TokenAmount, decimals: u8, symbol: &str) -> String {
    let raw = amount.raw().to_string();
    let decimals = decimals as usize;
    let number = if decimals == 0 {
        raw
    } else {
        let padded = format!("{raw:0>width$}", width = decimals + 1);
        let (whole, frac) = padded.split_at(padded.len() - decimals);
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{frac}")
        }
    };
    if symbol.is_empty() {
        number
    } else {
        format!("{number} {symbol}")
    }
}

/// Parse a decimal string such as `"25"` or `"0.125"` into base units.
pub fn parse_amount(input: &str, decimals: u8) -> Result<TokenAmount, AmountParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AmountParseError::Empty);
    }
    let (whole, frac) = input.split_once('.').unwrap_or((input, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(AmountParseError::InvalidDigit(input.to_string()));
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return Err(AmountParseError::InvalidDigit(input.to_string()));
    }
    if frac.len() > decimals as usize {
        return Err(AmountParseError::TooPrecise {
            input: input.to_string(),
            decimals,
        });
    }

    let overflow = || AmountParseError::Overflow(input.to_string());
    let digits = format!("{whole}{frac:0<width$}", width = decimals as usize);
    let raw = digits
        .bytes()
        .try_fold(0u128, |acc, b| {
            acc.checked_mul(10)?.checked_add(u128::from(b - b'0'))
        })
        .ok_or_else(overflow)?;
    Ok(TokenAmount::new(raw))
}
