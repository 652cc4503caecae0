use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use crate::entity::SwapError;

/// Convert a user-entered amount into raw token units.
///
/// Digits beyond the token's precision are truncated. Returns `None` for empty,
/// unparsable, negative or zero amounts, as well as amounts that round down to
/// zero raw units.
pub fn parse_ui_amount(input: &str, decimals: u8) -> Option<u64> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&normalized).ok()?;
    if value <= Decimal::ZERO {
        return None;
    }

    let scale = Decimal::try_from_i128_with_scale(10i128.checked_pow(decimals as u32)?, 0).ok()?;
    let raw = value.checked_mul(scale)?.trunc();

    raw.to_u64().filter(|raw| *raw > 0)
}

/// Format raw token units with exactly `decimals` fractional digits.
pub fn format_ui_amount(raw: u64, decimals: u8) -> String {
    if decimals == 0 {
        return raw.to_string();
    }

    // 10^38 is the largest power of ten a u128 holds
    let decimals = decimals.min(38);
    let base = 10u128.pow(decimals as u32);
    let raw = raw as u128;

    format!(
        "{}.{:0width$}",
        raw / base,
        raw % base,
        width = decimals as usize
    )
}

/// Parse a raw amount as returned by the aggregator (a decimal integer string).
pub fn parse_raw_amount(value: &str) -> Result<u64, SwapError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| SwapError::MalformedResponse(format!("invalid amount '{}': {}", value, e)))
}

/// Convert base58 string to Solana `Pubkey`.
pub fn parse_pubkey(address: &str) -> Result<Pubkey, SwapError> {
    Pubkey::from_str(address.trim()).map_err(|_| SwapError::InvalidAddress(address.to_string()))
}
