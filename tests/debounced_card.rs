mod common;

use anyhow::Result;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use teloxide::types::{ChatId, MessageId};

use common::{arc, ConfirmingRpc, GatedQuotes, StaticTokens, TransferSwapApi};
use swapana::entity::{CardSnapshot, SwapError, SwapOutcome, Token, TokenBalance};
use swapana::interactor::balance_interactor::BalanceInteractor;
use swapana::interactor::swap_interactor::{SwapInteractor, SwapInteractorImpl};
use swapana::presenter::swap_presenter::{SwapPresenter, SwapPresenterImpl};
use swapana::services::{QuoteDebouncer, SessionStore};
use swapana::solana::client::SignatureStatus;
use swapana::solana::jupiter::{SwapService, SwapSettings};
use swapana::view::swap_view::SwapView;

const CHAT: ChatId = ChatId(7);

#[derive(Default)]
struct RecordingView {
    renders: Mutex<Vec<CardSnapshot>>,
    messages: Mutex<Vec<String>>,
}

impl RecordingView {
    fn last_render(&self) -> CardSnapshot {
        self.renders.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl SwapView for RecordingView {
    async fn render_card(
        &self,
        snapshot: &CardSnapshot,
        existing: Option<MessageId>,
    ) -> Result<MessageId> {
        self.renders.lock().unwrap().push(snapshot.clone());
        Ok(existing.unwrap_or(MessageId(1)))
    }

    async fn display_swap_processing(&self, _snapshot: &CardSnapshot) -> Result<()> {
        self.messages.lock().unwrap().push("processing".to_string());
        Ok(())
    }

    async fn display_swap_success(&self, outcome: &SwapOutcome) -> Result<()> {
        self.messages
            .lock()
            .unwrap()
            .push(format!("success {}", outcome.amount_out));
        Ok(())
    }

    async fn display_error(&self, error: &SwapError) -> Result<()> {
        self.messages.lock().unwrap().push(format!("error {}", error));
        Ok(())
    }

    async fn display_usage(&self, usage: &str) -> Result<()> {
        self.messages.lock().unwrap().push(usage.to_string());
        Ok(())
    }
}

struct NoBalances;

#[async_trait]
impl BalanceInteractor for NoBalances {
    async fn refresh_card_balances(&self, _chat_id: ChatId) -> Result<(), SwapError> {
        Ok(())
    }

    async fn get_wallet_balances(
        &self,
        _chat_id: ChatId,
    ) -> Result<(String, Vec<(Token, TokenBalance)>), SwapError> {
        Err(SwapError::WalletNotConnected)
    }
}

struct Setup {
    quotes: Arc<GatedQuotes>,
    interactor: Arc<SwapInteractorImpl>,
    view: Arc<RecordingView>,
    presenter: SwapPresenterImpl<SwapInteractorImpl, NoBalances, RecordingView>,
}

fn setup() -> Setup {
    let sessions = arc(SessionStore::new(50, chrono::Duration::seconds(30)));
    let quotes = arc(GatedQuotes::new(171));
    let swap_service = arc(SwapService::new(
        arc(TransferSwapApi::new()),
        arc(ConfirmingRpc::new(SignatureStatus::Confirmed)),
        SwapSettings::default(),
    ));
    let interactor = arc(SwapInteractorImpl::new(
        sessions,
        arc(StaticTokens::new()),
        quotes.clone(),
        swap_service,
    ));
    let view = arc(RecordingView::default());
    let presenter = SwapPresenterImpl::new(
        interactor.clone(),
        arc(NoBalances),
        view.clone(),
        arc(QuoteDebouncer::new(Duration::from_millis(500))),
    );

    Setup {
        quotes,
        interactor,
        view,
        presenter,
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(600)).await;
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn typing_quickly_fetches_one_quote() {
    let s = setup();
    s.presenter.show_card(CHAT, true).await.unwrap();

    s.presenter.change_amount(CHAT, "1").await.unwrap();
    s.presenter.change_amount(CHAT, "1.5").await.unwrap();
    s.presenter.change_amount(CHAT, "2").await.unwrap();

    let pending = s.view.last_render();
    assert!(pending.card.is_quote_pending());
    assert_eq!(pending.card.to_amount, "");

    settle().await;

    assert_eq!(s.quotes.calls.load(Ordering::SeqCst), 1);
    let quoted = s.view.last_render();
    assert_eq!(quoted.card.from_amount, "2");
    assert_eq!(quoted.card.to_amount, "342.000000");
    assert!(!quoted.card.is_quote_pending());
    assert_eq!(s.interactor.card_message(CHAT), Some(MessageId(1)));
}

#[tokio::test(start_paused = true)]
async fn clearing_the_amount_cancels_the_fetch() {
    let s = setup();
    s.presenter.show_card(CHAT, true).await.unwrap();

    s.presenter.change_amount(CHAT, "1").await.unwrap();
    s.presenter.change_amount(CHAT, "").await.unwrap();
    settle().await;

    assert_eq!(s.quotes.calls.load(Ordering::SeqCst), 0);
    assert_eq!(s.view.last_render().card.to_amount, "");
}

#[tokio::test(start_paused = true)]
async fn swap_without_wallet_reports_the_blocker() {
    let s = setup();
    s.presenter.show_card(CHAT, true).await.unwrap();
    s.presenter.change_amount(CHAT, "1").await.unwrap();
    settle().await;

    s.presenter.swap(CHAT).await.unwrap();

    let messages = s.view.messages.lock().unwrap().clone();
    assert_eq!(messages, vec![format!("error {}", SwapError::WalletNotConnected)]);
}

#[tokio::test(start_paused = true)]
async fn bad_slippage_shows_usage() {
    let s = setup();
    s.presenter.show_card(CHAT, true).await.unwrap();

    s.presenter.change_slippage(CHAT, "lots").await.unwrap();
    s.presenter.change_slippage(CHAT, "1%").await.unwrap();

    let messages = s.view.messages.lock().unwrap().clone();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("basis points"));
    assert_eq!(s.view.last_render().card.slippage_bps, 100);
}
