use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: String,                // Token ID (mint address)
    pub name: String,              // Full token name
    pub symbol: String,            // Token symbol (e.g. "SOL", "USDC")
    pub icon: Option<String>,      // Token logo URI
    pub decimals: u8,              // Number of decimal places
    pub usd_price: Option<f64>,    // Last known USD price
    pub token_program: String,     // Owning token program (SPL Token or Token-2022)
}

impl Token {
    /// USD value of a UI amount, when the price is known.
    pub fn usd_value(&self, ui_amount: &str) -> Option<f64> {
        let amount = ui_amount.trim().parse::<f64>().ok()?;
        self.usd_price.map(|price| amount * price)
    }
}
