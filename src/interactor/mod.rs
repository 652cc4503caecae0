pub mod balance_interactor;
pub mod swap_interactor;
pub mod token_interactor;
pub mod wallet_interactor;
