use crate::domain::summary::ContractSummary;
use crate::error::{Error, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write as _;

pub const DELIMITED_HEADER: [&str; 6] = [
    "Contract",
    "Date",
    "Hour",
    "TotalQuantity",
    "TotalValue",
    "WeightedAveragePrice",
];

const RULE_WIDTH: usize = 90;

/// Fixed-width console table with thousands separators.
pub fn render_table(summaries: &[ContractSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:<12} {:<8} {:<15} {:<18} {:<15}",
        "Contract", "Date", "Hour", "Total Quantity", "Total Value", "Weighted Avg"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    for s in summaries {
        let _ = writeln!(
            out,
            "{:<12} {:<12} {:<8} {:>12} {:>18} {:>15}",
            s.contract_name,
            s.display_date,
            s.display_hour,
            format_grouped(s.total_quantity),
            format_grouped(s.total_value),
            format_grouped(s.weighted_average_price),
        );
    }
    out
}

/// Comma-delimited report. Contract names are written as-is.
pub fn to_delimited(summaries: &[ContractSummary]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(DELIMITED_HEADER)?;
    for s in summaries {
        let quantity = format_plain(s.total_quantity);
        let value = format_plain(s.total_value);
        let average = format_plain(s.weighted_average_price);
        writer.write_record([
            s.contract_name.as_str(),
            s.display_date.as_str(),
            s.display_hour.as_str(),
            quantity.as_str(),
            value.as_str(),
            average.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Csv(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `1234567.891` -> `1234567.89`
pub fn format_plain(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}

/// `1234567.891` -> `1,234,567.89`
pub fn format_grouped(value: Decimal) -> String {
    let plain = format_plain(value);
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{frac_part}")
}
