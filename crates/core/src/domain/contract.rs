use chrono::NaiveDate;

const HOURLY_PREFIX: &str = "PH";
const STAMP_LEN: usize = 8;

/// Delivery date and hour encoded in an hourly contract name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractSlot {
    pub date: NaiveDate,
    pub hour: u32,
}

impl ContractSlot {
    /// `dd/MM/yyyy`
    pub fn display_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }

    /// `HH:00`
    pub fn display_hour(&self) -> String {
        format!("{:02}:00", self.hour)
    }
}

/// Parses names like `PH25031514` (`PH` + `yyMMddHH`, any suffix allowed).
///
/// Two-digit years 00-49 are 20xx and 50-99 are 19xx.
pub fn parse_contract_slot(name: &str) -> Option<ContractSlot> {
    let rest = name.strip_prefix(HOURLY_PREFIX)?;
    let stamp = rest.get(..STAMP_LEN)?;
    if !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let field = |range: std::ops::Range<usize>| stamp[range].parse::<u32>().ok();
    let yy = field(0..2)?;
    let month = field(2..4)?;
    let day = field(4..6)?;
    let hour = field(6..8)?;

    if hour > 23 {
        return None;
    }

    let year = if yy < 50 { 2000 + yy } else { 1900 + yy };
    let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;
    Some(ContractSlot { date, hour })
}

/// Display date and hour for a contract, `"-"` for both when the name carries no slot.
pub fn display_slot(name: &str) -> (String, String) {
    match parse_contract_slot(name) {
        Some(slot) => (slot.display_date(), slot.display_hour()),
        None => ("-".to_string(), "-".to_string()),
    }
}
