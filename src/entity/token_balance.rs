use serde::{Deserialize, Serialize};

use crate::solana::utils::format_ui_amount;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub mint: String,
    pub owner: String,
    pub amount: u64, // raw units
    pub decimals: u8,
}

impl TokenBalance {
    pub fn zero(mint: &str, owner: &str, decimals: u8) -> Self {
        Self {
            mint: mint.to_string(),
            owner: owner.to_string(),
            amount: 0,
            decimals,
        }
    }

    pub fn ui_amount(&self) -> String {
        format_ui_amount(self.amount, self.decimals)
    }
}
