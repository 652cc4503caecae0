/// A swap that reached the requested commitment on chain.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapOutcome {
    pub source_symbol: String,
    pub target_symbol: String,
    pub amount_in: String,
    pub amount_out: String,
    pub signature: String,
}

impl SwapOutcome {
    pub fn explorer_url(&self) -> String {
        format!("https://explorer.solana.com/tx/{}", self.signature)
    }
}
