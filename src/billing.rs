//! Invoice arithmetic and the colour/label mappings shared by the pages.

use regex::Regex;

lazy_static! {
    static ref INVOICE_NUMBER: Regex =
        Regex::new(r"INV-(\d+)").expect("valid invoice number regex");
}

pub const INVOICE_PREFIX: &str = "INV-";

/// `amount` plus `tax_rate` percent of it.
pub fn calculate_total(amount: f64, tax_rate: f64) -> f64 {
    amount + amount * tax_rate / 100.0
}

/// Sequence number of the first `INV-<digits>` occurrence in `number`.
pub fn parse_invoice_number(number: &str) -> Option<u64> {
    INVOICE_NUMBER
        .captures(number)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

pub fn format_invoice_number(sequence: u64) -> String {
    format!("{}{:06}", INVOICE_PREFIX, sequence)
}

/// Number to issue after the highest one found in `existing`.
///
/// Entries that do not parse are ignored, so a user without any numbered
/// invoice starts at `INV-000001`.
pub fn next_invoice_number<'a, I>(existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let highest = existing
        .into_iter()
        .filter_map(parse_invoice_number)
        .max()
        .unwrap_or(0);
    format_invoice_number(highest.saturating_add(1))
}

pub fn status_color(status: &str) -> &'static str {
    match status {
        "paid" => "green",
        "pending" => "yellow",
        "overdue" => "red",
        "cancelled" => "gray",
        _ => "blue",
    }
}

pub fn status_label(status: &str) -> String {
    match status {
        "paid" => "Paid".to_owned(),
        "pending" => "Pending".to_owned(),
        "overdue" => "Overdue".to_owned(),
        "cancelled" => "Cancelled".to_owned(),
        other => other.to_owned(),
    }
}

pub fn progress_color(progress: i64) -> &'static str {
    if progress >= 100 {
        "green"
    } else if progress >= 50 {
        "yellow"
    } else {
        "red"
    }
}

/// Two decimals with `,` thousands separators.
pub fn format_money(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}
