use crate::entity::TokenSide;

/// Dialogue state: what the next plain text message from the chat means.
#[derive(Clone, Default, Debug)]
pub enum State {
    /// Plain text is read as a new "from" amount.
    #[default]
    Start,
    /// Plain text is a token search for the given side of the card.
    AwaitingTokenSearch { side: TokenSide },
    /// Plain text is a new slippage value.
    AwaitingSlippage,
}
