mod card_snapshot;
mod state;
mod swap_card;
mod swap_error;
mod swap_result;
mod token;
mod token_balance;
mod token_selector;

pub use card_snapshot::CardSnapshot;
pub use state::State;
pub use swap_card::{
    clamp_slippage, AcceptedQuote, QuoteOutcome, QuoteTicket, SwapBlocker, SwapCard, TokenSide,
    DEFAULT_SLIPPAGE_BPS, MAX_SLIPPAGE_BPS, MIN_SLIPPAGE_BPS,
};
pub use swap_error::{ErrorCategory, SwapError};
pub use swap_result::SwapOutcome;
pub use token::Token;
pub use token_balance::TokenBalance;
pub use token_selector::TokenSelector;
