use rust_decimal::Decimal;
use serde::Serialize;

/// Per-contract totals over one report run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractSummary {
    pub contract_name: String,
    pub display_date: String,
    pub display_hour: String,
    pub total_quantity: Decimal,
    pub total_value: Decimal,
    pub weighted_average_price: Decimal,
}
