use chrono::{Duration, Utc};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use teloxide::types::{ChatId, MessageId};

use crate::entity::{CardSnapshot, SwapCard, TokenBalance, TokenSelector};
use crate::solana::wallet::WalletAdapter;

/// Ephemeral state of one chat: its card, selector, wallet and balances.
pub struct ChatSession {
    pub card: SwapCard,
    pub selector: TokenSelector,
    pub wallet: Option<Arc<dyn WalletAdapter>>,
    pub card_message_id: Option<MessageId>,
    /// Last known balances by mint, for the connected wallet.
    pub balances: HashMap<String, TokenBalance>,
    /// Quotes older than this are not swapped.
    pub quote_max_age: Duration,
}

impl ChatSession {
    pub fn new(slippage_bps: u16, quote_max_age: Duration) -> Self {
        Self {
            card: SwapCard::new(None, None, slippage_bps),
            selector: TokenSelector::default(),
            wallet: None,
            card_message_id: None,
            balances: HashMap::new(),
            quote_max_age,
        }
    }

    pub fn wallet_address(&self) -> Option<String> {
        self.wallet.as_ref().map(|wallet| wallet.public_key().to_string())
    }

    /// Balance of `mint` for the wallet that is connected now.
    pub fn balance_of(&self, mint: &str) -> Option<TokenBalance> {
        let owner = self.wallet_address()?;
        self.balances
            .get(mint)
            .filter(|balance| balance.owner == owner)
            .cloned()
    }

    pub fn snapshot(&self) -> CardSnapshot {
        let balance_for = |token: Option<&crate::entity::Token>| {
            token.and_then(|token| self.balance_of(&token.id))
        };

        CardSnapshot {
            card: self.card.clone(),
            wallet: self.wallet_address(),
            from_balance: balance_for(self.card.from_token.as_ref()),
            to_balance: balance_for(self.card.to_token.as_ref()),
            taken_at: Utc::now(),
            quote_max_age: self.quote_max_age,
        }
    }
}

/// Per-chat sessions. Entries are only held for the duration of a closure,
/// never across an await.
pub struct SessionStore {
    sessions: DashMap<ChatId, ChatSession>,
    default_slippage_bps: u16,
    quote_max_age: Duration,
}

impl SessionStore {
    pub fn new(default_slippage_bps: u16, quote_max_age: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            default_slippage_bps,
            quote_max_age,
        }
    }

    pub fn with_session<R>(&self, chat_id: ChatId, f: impl FnOnce(&mut ChatSession) -> R) -> R {
        let mut entry = self
            .sessions
            .entry(chat_id)
            .or_insert_with(|| ChatSession::new(self.default_slippage_bps, self.quote_max_age));
        f(entry.value_mut())
    }

    pub fn snapshot(&self, chat_id: ChatId) -> CardSnapshot {
        self.with_session(chat_id, |session| session.snapshot())
    }

    pub fn wallet(&self, chat_id: ChatId) -> Option<Arc<dyn WalletAdapter>> {
        self.with_session(chat_id, |session| session.wallet.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::Keypair;

    use crate::solana::wallet::KeypairWallet;

    #[test]
    fn balances_of_a_previous_wallet_are_hidden() {
        let store = SessionStore::new(50, Duration::seconds(30));
        let chat = ChatId(42);
        let old = KeypairWallet::new(Keypair::new());
        let old_owner = old.public_key().to_string();

        store.with_session(chat, |session| {
            session.wallet = Some(Arc::new(old));
            session.balances.insert(
                "mint".to_string(),
                TokenBalance {
                    mint: "mint".to_string(),
                    owner: old_owner.clone(),
                    amount: 5,
                    decimals: 0,
                },
            );
        });
        assert!(store.with_session(chat, |s| s.balance_of("mint")).is_some());

        store.with_session(chat, |session| {
            session.wallet = Some(Arc::new(KeypairWallet::new(Keypair::new())));
        });
        assert!(store.with_session(chat, |s| s.balance_of("mint")).is_none());
    }

    #[test]
    fn sessions_start_with_default_slippage() {
        let store = SessionStore::new(75, Duration::seconds(30));

        let snapshot = store.snapshot(ChatId(1));

        assert_eq!(snapshot.card.slippage_bps, 75);
        assert!(!snapshot.wallet_connected());
    }
}
