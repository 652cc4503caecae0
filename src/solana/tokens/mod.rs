pub mod constants;
pub mod spl;

pub use constants::{SOL_MINT, USDC_MINT};
pub use spl::{get_native_balance, get_token_balance, token_program_id};
