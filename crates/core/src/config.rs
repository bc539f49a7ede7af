use crate::CurrencyLedger;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartingBalance {
    pub currency: String,
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub starting_balances: Vec<StartingBalance>,
}

impl SessionConfig {
    pub fn starting_ledger(&self) -> CurrencyLedger {
        CurrencyLedger::with_balances(
            self.starting_balances
                .iter()
                .map(|entry| (entry.currency.clone(), entry.amount)),
        )
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_balances: vec![
                StartingBalance {
                    currency: "GP".to_string(),
                    amount: 100_000,
                },
                StartingBalance {
                    currency: "coins".to_string(),
                    amount: 500,
                },
            ],
        }
    }
}
