// Known token information
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

// Token programs
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const TOKEN_2022_PROGRAM_ID: &str = "TokenzQdBNbLqP5VEhdkAS6EPFLC18p7bKHr6zSEaYX4";

// Define token decimals
pub const SOL_DECIMALS: u8 = 9;
pub const USDC_DECIMALS: u8 = 6;

// Account layouts shared by SPL Token and Token-2022
pub const TOKEN_ACCOUNT_AMOUNT_OFFSET: usize = 64;
pub const MINT_DECIMALS_OFFSET: usize = 44;
