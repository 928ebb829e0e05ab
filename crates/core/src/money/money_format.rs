//! Currency formatting for export cells.

use super::Money;
use crate::settings::{DigitGrouping, ReportingSettings};

/// Formats an amount as a currency string, e.g. `₹1,00,000.00`.
///
/// The amount is rounded half-up to the configured minor units first, then the
/// integer part is grouped according to the configured digit grouping.
pub fn format_currency(amount: Money, settings: &ReportingSettings) -> String {
    let mut rounded = amount.round_for_display(settings.minor_units).amount();
    rounded.rescale(settings.minor_units);

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();
    let (integer_part, fraction_part) = match text.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + 8);
    if negative {
        out.push('-');
    }
    out.push_str(&settings.currency_symbol);
    out.push_str(&group_digits(integer_part, settings.digit_grouping));
    if let Some(frac) = fraction_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_digits(digits: &str, grouping: DigitGrouping) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(len - 3);
    let group_size = match grouping {
        DigitGrouping::Indian => 2,
        DigitGrouping::Western => 3,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(group_size);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    groups.push(tail);
    groups.join(",")
}
