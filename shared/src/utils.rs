//! # Shared Utility Functions
//!
//! Display helpers shared by the client library and its CLI.
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::transaction::Currency;
//! use shared::utils::{format_amount, truncate};
//!
//! assert_eq!(format_amount(1234.5, Currency::Usd), "$1,234.50");
//! assert_eq!(truncate("Monthly apartment rent", 10), "Monthly...");
//! ```

use crate::dto::transaction::Currency;

/// Format an amount with the currency symbol, two decimals and thousands separators.
///
/// Negative amounts keep the sign in front of the symbol.
///
/// # Examples
///
/// ```rust
/// use shared::dto::transaction::Currency;
/// use shared::utils::format_amount;
///
/// assert_eq!(format_amount(4.5, Currency::Inr), "₹4.50");
/// assert_eq!(format_amount(-1000.0, Currency::Eur), "-€1,000.00");
/// ```
pub fn format_amount(amount: f64, currency: Currency) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}{}.{}", sign, currency.symbol(), grouped, fraction)
}

/// Shorten `text` to at most `max_chars` characters, ending with `...` when cut.
///
/// Works on characters, not bytes, so multi-byte descriptions never panic.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }

    let kept: String = text.chars().take(max_chars - 3).collect();
    format!("{}...", kept.trim_end())
}
