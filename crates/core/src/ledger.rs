use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named currency balances. The only mutation is a checked debit, so no
/// balance can go below zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyLedger {
    balances: BTreeMap<String, u64>,
}

impl CurrencyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balances<I, S>(balances: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self {
            balances: balances
                .into_iter()
                .map(|(name, amount)| (name.into(), amount))
                .collect(),
        }
    }

    /// Unknown currencies read as zero.
    pub fn balance(&self, currency: &str) -> u64 {
        self.balances.get(currency).copied().unwrap_or(0)
    }

    pub fn try_debit(&mut self, currency: &str, amount: u64) -> bool {
        if amount == 0 {
            return true;
        }
        match self.balances.get_mut(currency) {
            Some(balance) if *balance >= amount => {
                *balance -= amount;
                true
            }
            _ => false,
        }
    }

    pub fn balances(&self) -> &BTreeMap<String, u64> {
        &self.balances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debit_within_balance() {
        let mut ledger = CurrencyLedger::with_balances([("GP", 1000)]);
        assert!(ledger.try_debit("GP", 400));
        assert_eq!(ledger.balance("GP"), 600);
        assert!(ledger.try_debit("GP", 600));
        assert_eq!(ledger.balance("GP"), 0);
    }

    #[test]
    fn debit_beyond_balance_leaves_it_untouched() {
        let mut ledger = CurrencyLedger::with_balances([("coins", 50)]);
        assert!(!ledger.try_debit("coins", 51));
        assert_eq!(ledger.balance("coins"), 50);
    }

    #[test]
    fn unknown_currency_reads_zero_and_refuses_debit() {
        let mut ledger = CurrencyLedger::with_balances([("GP", 10)]);
        assert_eq!(ledger.balance("gems"), 0);
        assert!(!ledger.try_debit("gems", 1));
        assert!(!ledger.balances().contains_key("gems"));
    }

    #[test]
    fn serializes_as_plain_map() {
        let ledger = CurrencyLedger::with_balances([("GP", 100000), ("coins", 500)]);
        let body = serde_json::to_string(&ledger).expect("serialize");
        assert_eq!(body, r#"{"GP":100000,"coins":500}"#);
    }
}
