//! Display formatting shared by cards, detail pages and the request board.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::infrastructure::encoding::percent_encode;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_DAY: i64 = 86400;

/// Marketplace name used in outgoing contact messages.
pub const MARKET_NAME: &str = "ListAgain";

/// Formats a price as `$12` or `$12.50`.
///
/// Whole amounts drop the fractional part; anything else is shown with two
/// decimals.
///
/// # Examples
///
/// ```
/// use listagain::domain::format::format_price;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_price(Decimal::from(40)), "$40");
/// assert_eq!(format_price(Decimal::new(1999, 2)), "$19.99");
/// assert_eq!(format_price(Decimal::new(125, 1)), "$12.50");
/// ```
#[must_use]
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp(2);
    if rounded.fract().is_zero() {
        format!("${}", rounded.trunc().normalize())
    } else {
        let mut cents = rounded;
        cents.rescale(2);
        format!("${cents}")
    }
}

/// Formats a budget range as `$20 - $50`.
#[must_use]
pub fn format_budget(min: Decimal, max: Decimal) -> String {
    format!("{} - {}", format_price(min), format_price(max))
}

/// Relative age of a timestamp ("just now", "5m ago", "3h ago", "2d ago").
#[must_use]
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - timestamp).num_seconds();

    if diff < SECONDS_PER_MINUTE {
        "just now".to_string()
    } else if diff < SECONDS_PER_HOUR {
        let mins = diff / SECONDS_PER_MINUTE;
        format!("{mins}m ago")
    } else if diff < SECONDS_PER_DAY {
        let hours = diff / SECONDS_PER_HOUR;
        format!("{hours}h ago")
    } else {
        let days = diff / SECONDS_PER_DAY;
        format!("{days}d ago")
    }
}

/// Builds a WhatsApp deep link that opens a chat with the seller.
///
/// Non-digit characters are stripped from the phone number. Returns `None`
/// when no digits remain.
#[must_use]
pub fn whatsapp_link(phone: &str, title: &str, price: Decimal) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    let message = format!(
        "Hi, I'm interested in your {title} listed for {} on {MARKET_NAME}.",
        format_price(price)
    );
    Some(format!("https://wa.me/{digits}?text={}", percent_encode(&message)))
}
