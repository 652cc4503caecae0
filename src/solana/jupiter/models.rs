// src/solana/jupiter/models.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::{SwapError, Token};
use crate::solana::tokens::constants::TOKEN_PROGRAM_ID;
use crate::solana::utils::parse_raw_amount;

// Swap modes (exact input or exact output amount)
#[derive(Serialize, Deserialize, Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum SwapMode {
    #[default]
    ExactIn,
    ExactOut,
}

// Token entry as returned by the token list and search endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JupiterToken {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub icon: Option<String>,
    pub decimals: u8,
    pub usd_price: Option<f64>,
    pub token_program: Option<String>,
}

impl From<JupiterToken> for Token {
    fn from(token: JupiterToken) -> Self {
        Token {
            id: token.id,
            name: token.name,
            symbol: token.symbol,
            icon: token.icon.filter(|icon| !icon.is_empty()),
            decimals: token.decimals,
            usd_price: token.usd_price,
            token_program: token
                .token_program
                .filter(|program| !program.is_empty())
                .unwrap_or_else(|| TOKEN_PROGRAM_ID.to_string()),
        }
    }
}

// Parameters for a quote request
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct QuoteParams {
    pub input_mint: String,
    pub output_mint: String,
    pub amount: u64,
    pub slippage_bps: u16,
}

/// Quote as returned by the aggregator.
///
/// Only the fields the card reads are typed; everything else is carried in
/// `extra` so the quote can be posted back to `/swap` unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub input_mint: String,
    pub in_amount: String,
    pub output_mint: String,
    pub out_amount: String,
    pub other_amount_threshold: String,
    #[serde(default)]
    pub swap_mode: SwapMode,
    pub slippage_bps: u16,
    #[serde(default)]
    pub route_plan: Vec<RoutePlan>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QuoteResponse {
    pub fn out_amount_raw(&self) -> Result<u64, SwapError> {
        parse_raw_amount(&self.out_amount)
    }

    /// Minimum received after slippage, in raw output units.
    pub fn minimum_out_raw(&self) -> Result<u64, SwapError> {
        parse_raw_amount(&self.other_amount_threshold)
    }

    /// Price impact in percent. The API sends it as a string, older versions as a number.
    pub fn price_impact_pct(&self) -> Option<f64> {
        let fraction = match self.extra.get("priceImpactPct")? {
            Value::String(value) => value.parse::<f64>().ok(),
            Value::Number(value) => value.as_f64(),
            _ => None,
        };

        fraction.map(|fraction| fraction * 100.0)
    }

    pub fn route_labels(&self) -> Vec<String> {
        self.route_plan
            .iter()
            .filter_map(|step| step.swap_info.label.clone())
            .collect()
    }

    /// Check that the quote answers the given request and carries usable amounts.
    pub fn validate_for(&self, params: &QuoteParams) -> Result<(), SwapError> {
        if self.input_mint != params.input_mint || self.output_mint != params.output_mint {
            return Err(SwapError::MalformedResponse(format!(
                "quote is for {} -> {}, expected {} -> {}",
                self.input_mint, self.output_mint, params.input_mint, params.output_mint
            )));
        }

        self.out_amount_raw()?;
        self.minimum_out_raw()?;

        Ok(())
    }
}

// One hop of the route
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    pub swap_info: SwapInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<u8>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Details of a single AMM swap inside a route
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapInfo {
    pub amm_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub input_mint: String,
    pub output_mint: String,
    pub in_amount: String,
    pub out_amount: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Request body for /swap
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub user_public_key: String,
    pub wrap_and_unwrap_sol: bool,
    pub dynamic_compute_unit_limit: bool,
    pub quote_response: QuoteResponse,
}

// Response of /swap
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub swap_transaction: String,
    pub last_valid_block_height: Option<u64>,
    pub prioritization_fee_lamports: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) const SOL_USDC_QUOTE: &str = r#"{
        "inputMint": "So11111111111111111111111111111111111111112",
        "inAmount": "1000000000",
        "outputMint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
        "outAmount": "171234567",
        "otherAmountThreshold": "170378394",
        "swapMode": "ExactIn",
        "slippageBps": 50,
        "platformFee": null,
        "priceImpactPct": "0.0012",
        "routePlan": [
            {
                "swapInfo": {
                    "ammKey": "8sLbNZoA1cfnvMJLPfp98ZLAnFSYCFApfJKMbiXNLwxj",
                    "label": "Raydium CLMM",
                    "inputMint": "So11111111111111111111111111111111111111112",
                    "outputMint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
                    "inAmount": "1000000000",
                    "outAmount": "171234567",
                    "feeAmount": "25000",
                    "feeMint": "So11111111111111111111111111111111111111112"
                },
                "percent": 100
            }
        ],
        "contextSlot": 299283763,
        "timeTaken": 0.0213
    }"#;

    fn params() -> QuoteParams {
        QuoteParams {
            input_mint: "So11111111111111111111111111111111111111112".to_string(),
            output_mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".to_string(),
            amount: 1_000_000_000,
            slippage_bps: 50,
        }
    }

    #[test]
    fn parses_quote_and_reads_amounts() {
        let quote: QuoteResponse = serde_json::from_str(SOL_USDC_QUOTE).unwrap();

        assert_eq!(quote.out_amount_raw().unwrap(), 171_234_567);
        assert_eq!(quote.minimum_out_raw().unwrap(), 170_378_394);
        assert_eq!(quote.swap_mode, SwapMode::ExactIn);
        assert_eq!(quote.route_labels(), vec!["Raydium CLMM".to_string()]);
        let impact = quote.price_impact_pct().unwrap();
        assert!((impact - 0.12).abs() < 1e-9);
        assert!(quote.validate_for(&params()).is_ok());
    }

    #[test]
    fn unmodelled_fields_survive_the_trip_back_to_swap() {
        let quote: QuoteResponse = serde_json::from_str(SOL_USDC_QUOTE).unwrap();
        let body = serde_json::to_value(SwapRequest {
            user_public_key: "11111111111111111111111111111111".to_string(),
            wrap_and_unwrap_sol: true,
            dynamic_compute_unit_limit: true,
            quote_response: quote,
        })
        .unwrap();

        assert_eq!(body["wrapAndUnwrapSol"], Value::Bool(true));
        assert_eq!(body["quoteResponse"]["contextSlot"], serde_json::json!(299283763));
        assert_eq!(
            body["quoteResponse"]["routePlan"][0]["swapInfo"]["feeAmount"],
            Value::String("25000".to_string())
        );
    }

    #[test]
    fn rejects_quotes_for_another_pair() {
        let quote: QuoteResponse = serde_json::from_str(SOL_USDC_QUOTE).unwrap();
        let mut other = params();
        other.output_mint = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB".to_string();

        assert!(matches!(
            quote.validate_for(&other),
            Err(SwapError::MalformedResponse(_))
        ));
    }

    #[test]
    fn rejects_non_integer_out_amount() {
        let mut quote: QuoteResponse = serde_json::from_str(SOL_USDC_QUOTE).unwrap();
        quote.out_amount = "lots".to_string();

        assert!(quote.validate_for(&params()).is_err());
    }

    #[test]
    fn token_program_defaults_to_spl_token() {
        let token: JupiterToken = serde_json::from_str(
            r#"{"id":"EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v","name":"USD Coin","symbol":"USDC","icon":"","decimals":6,"usdPrice":0.9998}"#,
        )
        .unwrap();
        let token = Token::from(token);

        assert_eq!(token.token_program, TOKEN_PROGRAM_ID);
        assert_eq!(token.icon, None);
        assert_eq!(token.usd_price, Some(0.9998));
    }
}
