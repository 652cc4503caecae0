pub mod client;
pub mod jupiter;
pub mod tokens;
pub mod utils;
pub mod wallet;

// Re-export commonly used items
pub use client::{create_solana_client, RpcGateway, SignatureStatus};
pub use tokens::constants::{SOL_MINT, USDC_MINT};
pub use wallet::{keypair_from_base58, KeypairWallet, WalletAdapter};
