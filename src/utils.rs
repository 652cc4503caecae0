use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::entity::clamp_slippage;

/// Parse a slippage value: `0.5%` or `0.5` is a percentage, a bare integer
/// like `50` is basis points. The result is clamped to the allowed range.
pub fn parse_slippage(input: &str) -> Option<u16> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^(\d+(?:[.,]\d+)?)\s*(%|bps)?$").unwrap();
    }

    let input = input.trim();
    let cap = RE.captures(input)?;
    let number = cap.get(1)?.as_str().replace(',', ".");
    let unit = cap.get(2).map(|m| m.as_str());

    let is_percent = match unit {
        Some("%") => true,
        Some(_) => false,
        None => number.contains('.'),
    };

    let value = Decimal::from_str(&number).ok()?;
    let bps = if is_percent {
        (value * Decimal::from(100)).round()
    } else {
        value.round()
    };

    let bps = bps.to_u64()?.min(u16::MAX as u64) as u16;
    if bps == 0 {
        return None;
    }

    Some(clamp_slippage(bps))
}

/// Slippage in basis points as a percentage, e.g. `50` -> `0.5%`.
pub fn format_slippage(bps: u16) -> String {
    let percent = Decimal::new(bps as i64, 2).normalize();
    format!("{}%", percent)
}

// Format a USD estimate
pub fn format_usd(value: f64) -> String {
    if value > 0.0 && value < 0.01 {
        "<$0.01".to_string()
    } else {
        format!("${:.2}", value)
    }
}

// Shorten address for display
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }

    let start = &address[..5];
    let end = &address[address.len() - 5..];

    format!("{}...{}", start, end)
}
