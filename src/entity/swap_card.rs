use chrono::{DateTime, Duration, Utc};

use crate::entity::{SwapError, Token};
use crate::solana::jupiter::models::{QuoteParams, QuoteResponse};
use crate::solana::utils::{format_ui_amount, parse_ui_amount};

pub const DEFAULT_SLIPPAGE_BPS: u16 = 50;
pub const MIN_SLIPPAGE_BPS: u16 = 10;
pub const MAX_SLIPPAGE_BPS: u16 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSide {
    From,
    To,
}

impl TokenSide {
    pub fn opposite(self) -> Self {
        match self {
            TokenSide::From => TokenSide::To,
            TokenSide::To => TokenSide::From,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenSide::From => "from",
            TokenSide::To => "to",
        }
    }
}

/// A quote request issued by the card. The id must still be current when the
/// response comes back, otherwise the response is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteTicket {
    pub request_id: u64,
    pub params: QuoteParams,
}

#[derive(Debug, Clone)]
pub struct AcceptedQuote {
    pub response: QuoteResponse,
    pub params: QuoteParams,
    pub received_at: DateTime<Utc>,
}

impl AcceptedQuote {
    pub fn is_expired(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now - self.received_at > max_age
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteOutcome {
    Applied,
    Failed,
    /// The card moved on since the request was issued.
    Stale,
}

/// First reason the swap action is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapBlocker {
    WalletDisconnected,
    MissingToken,
    InvalidAmount,
    QuotePending,
    SwapPending,
    NoQuote,
    /// The quote is older than the allowed age.
    QuoteExpired,
}

impl SwapBlocker {
    pub fn label(&self) -> &'static str {
        match self {
            SwapBlocker::WalletDisconnected => "Connect wallet",
            SwapBlocker::MissingToken => "Select tokens",
            SwapBlocker::InvalidAmount => "Enter amount",
            SwapBlocker::QuotePending => "Fetching quote...",
            SwapBlocker::SwapPending => "Swapping...",
            SwapBlocker::NoQuote => "No quote",
            SwapBlocker::QuoteExpired => "🔄 Refresh quote",
        }
    }
}

/// Transient state of one swap card.
#[derive(Debug, Clone)]
pub struct SwapCard {
    pub from_token: Option<Token>,
    pub to_token: Option<Token>,
    /// Amount as typed by the user.
    pub from_amount: String,
    /// Derived from the current quote; never typed.
    pub to_amount: String,
    pub slippage_bps: u16,
    pub quote_error: Option<String>,
    quote: Option<AcceptedQuote>,
    quote_pending: bool,
    swap_pending: bool,
    quote_request_id: u64,
}

impl Default for SwapCard {
    fn default() -> Self {
        Self::new(None, None, DEFAULT_SLIPPAGE_BPS)
    }
}

impl SwapCard {
    pub fn new(from_token: Option<Token>, to_token: Option<Token>, slippage_bps: u16) -> Self {
        Self {
            from_token,
            to_token,
            from_amount: String::new(),
            to_amount: String::new(),
            slippage_bps: clamp_slippage(slippage_bps),
            quote_error: None,
            quote: None,
            quote_pending: false,
            swap_pending: false,
            quote_request_id: 0,
        }
    }

    pub fn quote(&self) -> Option<&AcceptedQuote> {
        self.quote.as_ref()
    }

    pub fn is_quote_pending(&self) -> bool {
        self.quote_pending
    }

    pub fn is_swap_pending(&self) -> bool {
        self.swap_pending
    }

    pub fn token(&self, side: TokenSide) -> Option<&Token> {
        match side {
            TokenSide::From => self.from_token.as_ref(),
            TokenSide::To => self.to_token.as_ref(),
        }
    }

    /// Raw from-amount, when it parses to a positive value.
    pub fn raw_from_amount(&self) -> Option<u64> {
        let token = self.from_token.as_ref()?;
        parse_ui_amount(&self.from_amount, token.decimals)
    }

    /// Parameters for the current inputs, or `None` when no quote should be fetched.
    pub fn quote_params(&self) -> Option<QuoteParams> {
        let from = self.from_token.as_ref()?;
        let to = self.to_token.as_ref()?;
        if from.id == to.id {
            return None;
        }

        Some(QuoteParams {
            input_mint: from.id.clone(),
            output_mint: to.id.clone(),
            amount: self.raw_from_amount()?,
            slippage_bps: self.slippage_bps,
        })
    }

    /// Edits return `None` and change nothing while a swap is in flight.
    pub fn set_from_amount(&mut self, amount: &str) -> Option<QuoteTicket> {
        if self.swap_pending {
            return None;
        }
        self.from_amount = amount.trim().to_string();
        self.to_amount.clear();
        self.invalidate()
    }

    /// Put `token` on `side`. Picking the token that sits on the other side
    /// flips the card instead.
    pub fn select_token(&mut self, side: TokenSide, token: Token) -> Option<QuoteTicket> {
        if self.swap_pending {
            return None;
        }
        let opposite_matches = self
            .token(side.opposite())
            .map(|other| other.id == token.id)
            .unwrap_or(false);

        if opposite_matches {
            return self.flip();
        }

        match side {
            TokenSide::From => self.from_token = Some(token),
            TokenSide::To => self.to_token = Some(token),
        }
        self.to_amount.clear();
        self.invalidate()
    }

    /// Swap the tokens and the amounts. The previous from-amount stays in the
    /// to field only until the new quote resolves.
    pub fn flip(&mut self) -> Option<QuoteTicket> {
        if self.swap_pending {
            return None;
        }
        std::mem::swap(&mut self.from_token, &mut self.to_token);
        std::mem::swap(&mut self.from_amount, &mut self.to_amount);

        let ticket = self.invalidate();
        if ticket.is_none() {
            self.to_amount.clear();
        }
        ticket
    }

    pub fn set_slippage_bps(&mut self, slippage_bps: u16) -> Option<QuoteTicket> {
        if self.swap_pending {
            return None;
        }
        self.slippage_bps = clamp_slippage(slippage_bps);
        self.to_amount.clear();
        self.invalidate()
    }

    /// Re-request a quote for unchanged inputs.
    pub fn refresh(&mut self) -> Option<QuoteTicket> {
        if self.swap_pending {
            return None;
        }
        self.to_amount.clear();
        self.invalidate()
    }

    /// Apply the result of a quote request. Results for an outdated request
    /// leave the card untouched.
    pub fn apply_quote(
        &mut self,
        ticket: &QuoteTicket,
        result: Result<QuoteResponse, SwapError>,
        now: DateTime<Utc>,
    ) -> QuoteOutcome {
        if ticket.request_id != self.quote_request_id
            || self.quote_params().as_ref() != Some(&ticket.params)
        {
            return QuoteOutcome::Stale;
        }

        self.quote_pending = false;

        let decimals = match self.to_token.as_ref() {
            Some(token) => token.decimals,
            None => return QuoteOutcome::Stale,
        };

        match result.and_then(|response| response.out_amount_raw().map(|raw| (response, raw))) {
            Ok((response, out_raw)) => {
                self.to_amount = format_ui_amount(out_raw, decimals);
                self.quote_error = None;
                self.quote = Some(AcceptedQuote {
                    response,
                    params: ticket.params.clone(),
                    received_at: now,
                });
                QuoteOutcome::Applied
            }
            Err(e) => {
                self.to_amount.clear();
                self.quote = None;
                self.quote_error = Some(e.to_string());
                QuoteOutcome::Failed
            }
        }
    }

    /// Minimum received after slippage, formatted in output units.
    pub fn minimum_received(&self) -> Option<String> {
        let quote = self.quote.as_ref()?;
        let token = self.to_token.as_ref()?;
        let raw = quote.response.minimum_out_raw().ok()?;
        Some(format_ui_amount(raw, token.decimals))
    }

    pub fn price_impact_pct(&self) -> Option<f64> {
        self.quote.as_ref()?.response.price_impact_pct()
    }

    pub fn swap_blocker(
        &self,
        wallet_connected: bool,
        now: DateTime<Utc>,
        max_age: Duration,
    ) -> Option<SwapBlocker> {
        if !wallet_connected {
            return Some(SwapBlocker::WalletDisconnected);
        }
        if self.from_token.is_none() || self.to_token.is_none() {
            return Some(SwapBlocker::MissingToken);
        }
        if self.raw_from_amount().is_none() {
            return Some(SwapBlocker::InvalidAmount);
        }
        if self.swap_pending {
            return Some(SwapBlocker::SwapPending);
        }
        if self.quote_pending {
            return Some(SwapBlocker::QuotePending);
        }
        match &self.quote {
            None => Some(SwapBlocker::NoQuote),
            Some(quote) if quote.is_expired(now, max_age) => Some(SwapBlocker::QuoteExpired),
            Some(_) => None,
        }
    }

    /// Lock the card for a swap and hand out the quote to execute.
    pub fn begin_swap(
        &mut self,
        wallet_connected: bool,
        now: DateTime<Utc>,
        max_age: Duration,
    ) -> Result<AcceptedQuote, SwapError> {
        if let Some(blocker) = self.swap_blocker(wallet_connected, now, max_age) {
            return Err(blocker.into());
        }

        let quote = self.quote.clone().ok_or(SwapError::StaleQuote)?;
        if self.quote_params().as_ref() != Some(&quote.params) {
            return Err(SwapError::StaleQuote);
        }

        self.swap_pending = true;
        Ok(quote)
    }

    /// Unlock the card. A successful swap consumes the quote and the amounts.
    pub fn finish_swap(&mut self, success: bool) {
        self.swap_pending = false;

        if success {
            self.from_amount.clear();
            self.to_amount.clear();
            self.quote = None;
            self.quote_error = None;
            self.quote_pending = false;
            self.quote_request_id += 1;
        }
    }

    /// Back to an empty card with the given default tokens.
    pub fn reset(&mut self, from_token: Option<Token>, to_token: Option<Token>) {
        let next_id = self.quote_request_id + 1;
        *self = Self::new(from_token, to_token, self.slippage_bps);
        self.quote_request_id = next_id;
    }

    fn invalidate(&mut self) -> Option<QuoteTicket> {
        self.quote_request_id += 1;
        self.quote = None;
        self.quote_error = None;

        let params = self.quote_params();
        self.quote_pending = params.is_some();

        params.map(|params| QuoteTicket {
            request_id: self.quote_request_id,
            params,
        })
    }
}

pub fn clamp_slippage(slippage_bps: u16) -> u16 {
    slippage_bps.clamp(MIN_SLIPPAGE_BPS, MAX_SLIPPAGE_BPS)
}
