use crate::entity::{Token, TokenSide};

/// Searchable token picker for one side of the card.
#[derive(Debug, Clone, Default)]
pub struct TokenSelector {
    side: Option<TokenSide>,
    search_term: String,
}

impl TokenSelector {
    pub fn open(&mut self, side: TokenSide) {
        self.side = Some(side);
        self.search_term.clear();
    }

    pub fn close(&mut self) {
        self.side = None;
        self.search_term.clear();
    }

    pub fn side(&self) -> Option<TokenSide> {
        self.side
    }

    pub fn is_open(&self) -> bool {
        self.side.is_some()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Set the search term; returns the trimmed query when a remote search is due.
    pub fn set_search_term(&mut self, term: &str) -> Option<String> {
        self.search_term = term.trim().to_string();
        if self.search_term.is_empty() {
            None
        } else {
            Some(self.search_term.clone())
        }
    }

    /// Tokens to show: the local list without a search term, the remote
    /// results otherwise.
    pub fn visible_tokens<'a>(&self, local: &'a [Token], remote: Option<&'a [Token]>) -> &'a [Token] {
        if self.search_term.is_empty() {
            local
        } else {
            remote.unwrap_or(&[])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(symbol: &str) -> Token {
        Token {
            id: format!("{}-mint", symbol),
            name: symbol.to_string(),
            symbol: symbol.to_string(),
            icon: None,
            decimals: 6,
            usd_price: None,
            token_program: String::new(),
        }
    }

    #[test]
    fn empty_term_shows_local_list() {
        let local = vec![token("SOL"), token("USDC")];
        let remote = vec![token("BONK")];
        let mut selector = TokenSelector::default();
        selector.open(TokenSide::To);

        assert!(selector.set_search_term("   ").is_none());
        assert_eq!(selector.visible_tokens(&local, Some(&remote)).len(), 2);

        assert_eq!(selector.set_search_term(" bonk ").as_deref(), Some("bonk"));
        assert_eq!(selector.visible_tokens(&local, Some(&remote))[0].symbol, "BONK");
        assert!(selector.visible_tokens(&local, None).is_empty());
    }

    #[test]
    fn reopening_clears_the_term() {
        let mut selector = TokenSelector::default();
        assert!(!selector.is_open());

        selector.open(TokenSide::From);
        selector.set_search_term("jup");
        assert_eq!(selector.side(), Some(TokenSide::From));

        selector.open(TokenSide::To);
        assert_eq!(selector.search_term(), "");

        selector.set_search_term("jup");
        selector.close();
        assert!(!selector.is_open());
        assert_eq!(selector.search_term(), "");
    }
}
