use chrono::{DateTime, Duration, Utc};

use crate::entity::{SwapBlocker, SwapCard, TokenBalance};

/// Everything the view needs to draw a card, copied out of the session.
#[derive(Debug, Clone)]
pub struct CardSnapshot {
    pub card: SwapCard,
    pub wallet: Option<String>,
    pub from_balance: Option<TokenBalance>,
    pub to_balance: Option<TokenBalance>,
    pub taken_at: DateTime<Utc>,
    pub quote_max_age: Duration,
}

impl CardSnapshot {
    pub fn wallet_connected(&self) -> bool {
        self.wallet.is_some()
    }

    pub fn swap_blocker(&self) -> Option<SwapBlocker> {
        self.card
            .swap_blocker(self.wallet_connected(), self.taken_at, self.quote_max_age)
    }

    pub fn from_usd_value(&self) -> Option<f64> {
        self.card
            .from_token
            .as_ref()?
            .usd_value(&self.card.from_amount)
    }

    pub fn to_usd_value(&self) -> Option<f64> {
        self.card.to_token.as_ref()?.usd_value(&self.card.to_amount)
    }
}
