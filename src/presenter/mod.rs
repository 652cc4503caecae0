pub mod balance_presenter;
pub mod swap_presenter;
pub mod token_presenter;
pub mod wallet_presenter;
