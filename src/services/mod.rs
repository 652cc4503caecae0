pub mod quote_debouncer;
pub mod session_store;

pub use quote_debouncer::QuoteDebouncer;
pub use session_store::{ChatSession, SessionStore};
