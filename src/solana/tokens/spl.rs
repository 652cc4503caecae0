use log::debug;
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address_with_program_id;

use crate::entity::{SwapError, TokenBalance};
use crate::solana::client::RpcGateway;
use crate::solana::tokens::constants::{
    MINT_DECIMALS_OFFSET, SOL_DECIMALS, SOL_MINT, TOKEN_ACCOUNT_AMOUNT_OFFSET,
};
use crate::solana::utils::parse_pubkey;

/// Resolve the token program a token lives under, defaulting to SPL Token.
pub fn token_program_id(token_program: &str) -> Pubkey {
    parse_pubkey(token_program).unwrap_or(spl_token::ID)
}

/// Balance of `mint` held by `owner`.
///
/// Reads the owner's associated token account. A missing account is a zero
/// balance. The wrapped SOL mint reports the owner's native lamports instead,
/// since swaps wrap and unwrap SOL automatically.
pub async fn get_token_balance(
    rpc: &dyn RpcGateway,
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
    known_decimals: Option<u8>,
) -> Result<TokenBalance, SwapError> {
    if mint.to_string() == SOL_MINT {
        return get_native_balance(rpc, owner).await;
    }

    let token_account = get_associated_token_address_with_program_id(owner, mint, token_program);

    let amount = match rpc.account(&token_account).await? {
        Some(account) => read_token_amount(&account.data)?,
        None => {
            debug!(
                "No associated token account {} for owner {} and mint {}",
                token_account, owner, mint
            );
            0
        }
    };

    let decimals = match rpc.account(mint).await? {
        Some(mint_account) => read_mint_decimals(&mint_account.data)?,
        None => known_decimals.ok_or_else(|| SwapError::TokenNotFound(mint.to_string()))?,
    };

    Ok(TokenBalance {
        mint: mint.to_string(),
        owner: owner.to_string(),
        amount,
        decimals,
    })
}

/// Get native SOL balance; a missing system account holds zero lamports.
pub async fn get_native_balance(
    rpc: &dyn RpcGateway,
    owner: &Pubkey,
) -> Result<TokenBalance, SwapError> {
    let lamports = rpc
        .account(owner)
        .await?
        .map(|account| account.lamports)
        .unwrap_or(0);

    Ok(TokenBalance {
        mint: SOL_MINT.to_string(),
        owner: owner.to_string(),
        amount: lamports,
        decimals: SOL_DECIMALS,
    })
}

fn read_token_amount(data: &[u8]) -> Result<u64, SwapError> {
    let bytes = data
        .get(TOKEN_ACCOUNT_AMOUNT_OFFSET..TOKEN_ACCOUNT_AMOUNT_OFFSET + 8)
        .ok_or_else(|| SwapError::MalformedResponse("token account data too short".to_string()))?;

    let mut amount = [0u8; 8];
    amount.copy_from_slice(bytes);

    Ok(u64::from_le_bytes(amount))
}

fn read_mint_decimals(data: &[u8]) -> Result<u8, SwapError> {
    data.get(MINT_DECIMALS_OFFSET)
        .copied()
        .ok_or_else(|| SwapError::MalformedResponse("mint account data too short".to_string()))
}
