use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, info, warn};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::entity::{SwapError, Token};
use crate::solana::jupiter::config::Config;
use crate::solana::jupiter::models::JupiterToken;
use crate::solana::jupiter::response::read_api_response;
use crate::solana::tokens::constants::{
    SOL_DECIMALS, SOL_MINT, TOKEN_PROGRAM_ID, USDC_DECIMALS, USDC_MINT,
};

/// Upper bound on tokens remembered by mint
pub const MAX_CACHED_TOKENS: usize = 512;

/// Repository for working with tokens
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Tokens shown when the selector has no search term
    async fn list_tokens(&self) -> Result<Vec<Token>, SwapError>;

    /// Remote search by name, symbol or mint. An empty query lists tokens.
    async fn search_tokens(&self, query: &str) -> Result<Vec<Token>, SwapError>;

    /// Get token information by its mint address
    async fn get_token_by_id(&self, token_id: &str) -> Result<Token, SwapError>;
}

/// Token list reused until it is older than the ttl.
pub struct TokenListCache {
    ttl: Duration,
    entry: Mutex<Option<(Instant, Vec<Token>)>>,
}

impl TokenListCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// Cached tokens while fresh, otherwise the result of `fetch`. Concurrent callers share one fetch.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Vec<Token>, SwapError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Token>, SwapError>>,
    {
        let mut entry = self.entry.lock().await;
        if let Some((fetched_at, tokens)) = entry.as_ref() {
            if fetched_at.elapsed() < self.ttl {
                return Ok(tokens.clone());
            }
        }

        let tokens = fetch().await?;
        *entry = Some((Instant::now(), tokens.clone()));
        Ok(tokens)
    }
}

/// Implementation of the repository for working with Jupiter tokens
pub struct JupiterTokenRepository {
    http_client: Client,
    config: Config,
    token_list: TokenListCache,
    token_cache: DashMap<String, Token>,
}

impl JupiterTokenRepository {
    pub fn new(config: Config) -> Result<Self, SwapError> {
        Ok(Self {
            http_client: config.http_client()?,
            token_list: TokenListCache::new(config.token_list_ttl),
            config,
            token_cache: DashMap::new(),
        })
    }

    async fn fetch_tokens(&self, request: reqwest::RequestBuilder, context: &str) -> Result<Vec<Token>, SwapError> {
        let response = request.send().await?;
        let tokens: Vec<JupiterToken> = read_api_response(response, context).await?;

        Ok(tokens.into_iter().map(Token::from).collect())
    }

    async fn fetch_token_list(&self) -> Result<Vec<Token>, SwapError> {
        let url = self.config.token_list_url();
        debug!("Fetching token list from {}", url);

        let mut tokens = self
            .fetch_tokens(self.http_client.get(&url), "list_tokens")
            .await?;
        tokens.truncate(self.config.token_list_limit);

        info!("Loaded {} tokens ({})", tokens.len(), self.config.token_list_source);
        Ok(tokens)
    }

    fn remember(&self, token: &Token) {
        if self.token_cache.len() >= MAX_CACHED_TOKENS && !self.token_cache.contains_key(&token.id) {
            debug!("Token cache full, clearing {} entries", self.token_cache.len());
            self.token_cache.clear();
        }
        self.token_cache.insert(token.id.clone(), token.clone());
    }
}

#[async_trait]
impl TokenRepository for JupiterTokenRepository {
    async fn list_tokens(&self) -> Result<Vec<Token>, SwapError> {
        self.token_list.get_or_fetch(|| self.fetch_token_list()).await
    }

    async fn search_tokens(&self, query: &str) -> Result<Vec<Token>, SwapError> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_tokens().await;
        }

        debug!("Searching tokens for '{}'", query);
        let request = self
            .http_client
            .get(self.config.search_url())
            .query(&[("query", query)]);

        self.fetch_tokens(request, "search_tokens").await
    }

    async fn get_token_by_id(&self, token_id: &str) -> Result<Token, SwapError> {
        if let Some(token) = self.token_cache.get(token_id) {
            return Ok(token.clone());
        }

        let listed = self.list_tokens().await.unwrap_or_default();
        let found = match listed.into_iter().find(|token| token.id == token_id) {
            Some(token) => Some(token),
            None => match self.search_tokens(token_id).await {
                Ok(tokens) => tokens.into_iter().find(|token| token.id == token_id),
                Err(e) => {
                    warn!("Token lookup for {} failed: {}", token_id, e);
                    None
                }
            },
        };

        if let Some(token) = found {
            self.remember(&token);
            return Ok(token);
        }

        // SOL and USDC stay usable when the token API is down
        fallback_token(token_id).ok_or_else(|| SwapError::TokenNotFound(token_id.to_string()))
    }
}

/// Built-in metadata for the default pair.
pub fn fallback_token(token_id: &str) -> Option<Token> {
    let (name, symbol, decimals) = match token_id {
        SOL_MINT => ("Wrapped SOL", "SOL", SOL_DECIMALS),
        USDC_MINT => ("USD Coin", "USDC", USDC_DECIMALS),
        _ => return None,
    };

    Some(Token {
        id: token_id.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        icon: None,
        decimals,
        usd_price: None,
        token_program: TOKEN_PROGRAM_ID.to_string(),
    })
}

/// Pick the token a user referred to: an exact mint wins over a symbol match.
pub fn find_token(tokens: &[Token], token_ref: &str) -> Option<Token> {
    let token_ref = token_ref.trim();

    tokens
        .iter()
        .find(|token| token.id == token_ref)
        .or_else(|| {
            tokens
                .iter()
                .find(|token| token.symbol.eq_ignore_ascii_case(token_ref))
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactor::token_interactor::resolve_token;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const BONK: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";
    const WIF: &str = "EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm";

    fn listed_json(id: &str, symbol: &str) -> String {
        format!(
            r#"[{{"id":"{}","name":"{}","symbol":"{}","icon":null,"decimals":5,"usdPrice":null,"tokenProgram":null}}]"#,
            id, symbol, symbol
        )
    }

    /// Serves `list_body` on `/recent` and `search_body` on `/search`, counting list requests.
    async fn serve_tokens(list_body: String, search_body: String) -> (Config, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let list_requests = Arc::new(AtomicUsize::new(0));
        let counter = list_requests.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buffer = vec![0u8; 4096];
                let read = socket.read(&mut buffer).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buffer[..read]);

                let body = if request.starts_with("GET /recent") {
                    counter.fetch_add(1, Ordering::SeqCst);
                    &list_body
                } else {
                    &search_body
                };
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        let config = Config {
            api_url: format!("http://{}", address),
            ..Config::default()
        };
        (config, list_requests)
    }

    fn token(id: &str, symbol: &str) -> Token {
        Token {
            id: id.to_string(),
            name: symbol.to_string(),
            symbol: symbol.to_string(),
            icon: None,
            decimals: 6,
            usd_price: None,
            token_program: TOKEN_PROGRAM_ID.to_string(),
        }
    }

    #[test]
    fn mint_match_beats_symbol_match() {
        let tokens = vec![
            token("JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN", "JUP"),
            token("JUP", "FAKE"),
        ];

        assert_eq!(find_token(&tokens, "JUP").unwrap().symbol, "FAKE");
        assert_eq!(find_token(&tokens, "fake").unwrap().id, "JUP");
        assert!(find_token(&tokens, "BONK").is_none());
    }

    #[test]
    fn default_pair_has_fallbacks() {
        assert_eq!(fallback_token(SOL_MINT).unwrap().decimals, 9);
        assert_eq!(fallback_token(USDC_MINT).unwrap().symbol, "USDC");
        assert!(fallback_token("unknown").is_none());
    }

    #[tokio::test]
    async fn symbol_lookups_share_one_list_fetch() {
        let (config, list_requests) = serve_tokens(listed_json(BONK, "BONK"), "[]".to_string()).await;
        let repository = JupiterTokenRepository::new(config).unwrap();

        for _ in 0..3 {
            let token = resolve_token(&repository, "bonk").await.unwrap();
            assert_eq!(token.id, BONK);
        }
        repository.list_tokens().await.unwrap();

        assert_eq!(list_requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn search_results_are_not_remembered() {
        let (config, _) = serve_tokens("[]".to_string(), listed_json(WIF, "WIF")).await;
        let repository = JupiterTokenRepository::new(config).unwrap();

        let found = repository.search_tokens("wif").await.unwrap();
        assert_eq!(found[0].id, WIF);
        assert!(repository.token_cache.is_empty());

        let token = repository.get_token_by_id(WIF).await.unwrap();
        assert_eq!(token.symbol, "WIF");
        assert_eq!(repository.token_cache.len(), 1);
    }

    #[test]
    fn remembered_tokens_stay_bounded() {
        let repository = JupiterTokenRepository::new(Config::default()).unwrap();

        for index in 0..MAX_CACHED_TOKENS + 10 {
            repository.remember(&token(&format!("mint{}", index), "TKN"));
        }

        assert!(repository.token_cache.len() <= MAX_CACHED_TOKENS);
        assert!(repository.token_cache.contains_key(&format!("mint{}", MAX_CACHED_TOKENS + 9)));
    }

    #[tokio::test(start_paused = true)]
    async fn list_is_refetched_after_ttl() {
        let cache = TokenListCache::new(Duration::from_secs(60));
        let counter = AtomicUsize::new(0);
        let fetches = &counter;
        let fetch = move || async move {
            fetches.fetch_add(1, Ordering::SeqCst);
            Ok(vec![token(BONK, "BONK")])
        };

        cache.get_or_fetch(fetch).await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        cache.get_or_fetch(fetch).await.unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        let tokens = cache.get_or_fetch(fetch).await.unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(tokens[0].symbol, "BONK");
    }

    #[tokio::test]
    async fn failed_list_fetch_is_not_cached() {
        let cache = TokenListCache::new(Duration::from_secs(60));

        let failed = cache
            .get_or_fetch(|| async { Err(SwapError::Api("down".to_string())) })
            .await;
        assert!(failed.is_err());

        let tokens = cache
            .get_or_fetch(|| async { Ok(vec![token(BONK, "BONK")]) })
            .await
            .unwrap();
        assert_eq!(tokens.len(), 1);
    }
}
