//! The catalog of banks whose statements can be uploaded.

use serde::Serialize;

/// The column headings used in a bank's statement export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankLayout {
    /// The name of the bank, as sent by clients.
    pub name: &'static str,
    pub date_column: &'static str,
    pub description_column: &'static str,
    pub amount_column: &'static str,
    pub balance_column: &'static str,
}

/// Banks with a known statement layout, ordered by name.
const BANKS: &[BankLayout] = &[
    BankLayout {
        name: "Commercial Bank",
        date_column: "Date",
        description_column: "Description",
        amount_column: "Amount",
        balance_column: "Balance",
    },
    BankLayout {
        name: "Sampath Bank",
        date_column: "Transaction Date",
        description_column: "Transaction Details",
        amount_column: "Transaction Amount",
        balance_column: "Balance",
    },
];

/// All of the banks with a known statement layout, ordered by name.
pub fn supported_banks() -> &'static [BankLayout] {
    BANKS
}

/// Look up the statement layout for the bank called `name`.
///
/// The name must match exactly. Returns `None` for banks without a layout.
pub fn find_bank(name: &str) -> Option<&'static BankLayout> {
    BANKS.iter().find(|bank| bank.name == name)
}

#[cfg(test)]
mod tests {
    use super::{find_bank, supported_banks};

    #[test]
    fn finds_commercial_bank() {
        let bank = find_bank("Commercial Bank").unwrap();

        assert_eq!(bank.date_column, "Date");
        assert_eq!(bank.description_column, "Description");
        assert_eq!(bank.amount_column, "Amount");
        assert_eq!(bank.balance_column, "Balance");
    }

    #[test]
    fn finds_sampath_bank() {
        let bank = find_bank("Sampath Bank").unwrap();

        assert_eq!(bank.date_column, "Transaction Date");
        assert_eq!(bank.description_column, "Transaction Details");
        assert_eq!(bank.amount_column, "Transaction Amount");
        assert_eq!(bank.balance_column, "Balance");
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(find_bank("sampath bank"), None);
        assert_eq!(find_bank("Commercial"), None);
    }

    #[test]
    fn catalog_is_sorted_by_name() {
        let names = supported_banks()
            .iter()
            .map(|bank| bank.name)
            .collect::<Vec<_>>();
        let mut sorted = names.clone();
        sorted.sort();

        assert_eq!(names, sorted);
    }

    #[test]
    fn serializes_with_camel_case_columns() {
        let json = serde_json::to_value(find_bank("Commercial Bank").unwrap()).unwrap();

        assert_eq!(json["name"], "Commercial Bank");
        assert_eq!(json["dateColumn"], "Date");
        assert_eq!(json["balanceColumn"], "Balance");
    }
}
