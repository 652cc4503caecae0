use crate::entity::SwapBlocker;

/// How a failure should be surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Quote or swap fetch failed; shown inline on the card, user may retry.
    Network,
    /// Wallet missing or signing refused; the swap action stays disabled.
    Wallet,
    /// Bad user input or a card state that does not allow the action.
    Input,
    /// Submission or confirmation failed; shown as a notification.
    OnChain,
}

#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Jupiter API error: {0}")]
    Api(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Signing rejected: {0}")]
    SigningRejected(String),

    #[error("Invalid wallet key: {0}")]
    InvalidKeypair(String),

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Token not found: {0}")]
    TokenNotFound(String),

    #[error("Select both tokens first")]
    MissingToken,

    #[error("Quote is stale, refresh it before swapping")]
    StaleQuote,

    #[error("A quote is still being fetched")]
    QuotePending,

    #[error("A swap is already in progress")]
    SwapInProgress,

    #[error("Transaction submission failed: {0}")]
    Submission(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Transaction was not confirmed in time")]
    ConfirmationTimeout,

    #[error("Solana client error: {0}")]
    SolanaClient(String),
}

impl SwapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SwapError::Http(_) | SwapError::Api(_) | SwapError::MalformedResponse(_) => {
                ErrorCategory::Network
            }
            SwapError::WalletNotConnected
            | SwapError::SigningRejected(_)
            | SwapError::InvalidKeypair(_) => ErrorCategory::Wallet,
            SwapError::Submission(_)
            | SwapError::TransactionFailed(_)
            | SwapError::ConfirmationTimeout
            | SwapError::SolanaClient(_) => ErrorCategory::OnChain,
            _ => ErrorCategory::Input,
        }
    }
}

impl From<SwapBlocker> for SwapError {
    fn from(blocker: SwapBlocker) -> Self {
        match blocker {
            SwapBlocker::WalletDisconnected => SwapError::WalletNotConnected,
            SwapBlocker::MissingToken => SwapError::MissingToken,
            SwapBlocker::InvalidAmount => SwapError::InvalidAmount,
            SwapBlocker::QuotePending => SwapError::QuotePending,
            SwapBlocker::SwapPending => SwapError::SwapInProgress,
            SwapBlocker::NoQuote | SwapBlocker::QuoteExpired => SwapError::StaleQuote,
        }
    }
}
