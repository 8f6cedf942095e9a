use crate::domain::contract::display_slot;
use crate::domain::summary::ContractSummary;
use crate::domain::transaction::TransactionRecord;
use rust_decimal::Decimal;
use std::collections::HashMap;

// Quantities arrive in tenths of a MWh.
const QUANTITY_SCALE: Decimal = Decimal::TEN;

#[derive(Debug, Default)]
struct Totals {
    quantity: Decimal,
    value: Decimal,
}

/// Groups records by contract name and orders the summaries by display date, then hour.
///
/// Ordering compares the formatted `dd/MM/yyyy` strings, so it is lexicographic rather
/// than chronological. Contracts that compare equal keep their first-seen order.
pub fn aggregate(records: &[TransactionRecord]) -> Vec<ContractSummary> {
    let mut index = HashMap::<&str, usize>::new();
    let mut groups: Vec<(&str, Totals)> = Vec::new();

    for record in records {
        let Some(name) = record.contract_key() else {
            continue;
        };

        let slot = *index.entry(name).or_insert_with(|| {
            groups.push((name, Totals::default()));
            groups.len() - 1
        });

        let totals = &mut groups[slot].1;
        totals.quantity += record.quantity / QUANTITY_SCALE;
        totals.value += record.price * record.quantity / QUANTITY_SCALE;
    }

    let mut out: Vec<ContractSummary> = groups
        .into_iter()
        .map(|(name, totals)| summarize(name, totals))
        .collect();

    out.sort_by(|a, b| {
        a.display_date
            .cmp(&b.display_date)
            .then_with(|| a.display_hour.cmp(&b.display_hour))
    });

    tracing::debug!(
        records = records.len(),
        contracts = out.len(),
        "aggregated transactions"
    );
    out
}

fn summarize(name: &str, totals: Totals) -> ContractSummary {
    let weighted_average_price = if totals.quantity > Decimal::ZERO {
        totals.value / totals.quantity
    } else {
        Decimal::ZERO
    };
    let (display_date, display_hour) = display_slot(name);

    ContractSummary {
        contract_name: name.to_string(),
        display_date,
        display_hour,
        total_quantity: totals.quantity,
        total_value: totals.value,
        weighted_average_price,
    }
}
