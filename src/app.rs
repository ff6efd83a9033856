// src/app.rs

//! The kiosk driver: executes router commands on a single event loop.
//!
//! Owns the two deadlines (intro, rotation), the in-flight fetch and the
//! per-feed rotation state. All mutation happens from `navigate`, `reload`
//! and `idle`, which the embedder calls from one task; there is no
//! parallelism to guard against. A fetch that was superseded by a newer
//! navigation still completes, but its generation no longer matches and
//! the router discards it before it can render.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

use crate::error::Result;
use crate::models::{Config, FactEntry, FeedData, FeedKind, NeedToKnowEntry, QuoteEntry};
use crate::render::Renderer;
use crate::rotation::{FeedRotation, ms_until_next_slot};
use crate::router::{Command, Router, RouterState};
use crate::services::{FeedSource, load_feed};
use crate::storage::IndexStore;
use crate::utils::date;
use crate::utils::text::quote_signature;
use crate::views;

/// Completion of one feed fetch, tagged with its load generation.
struct FetchOutcome {
    generation: u64,
    fragment: String,
    result: Result<FeedData>,
}

/// Internal event the loop can wake up on.
enum Event {
    IntroElapsed,
    RotationElapsed,
    FetchDone(FetchOutcome),
}

/// The content kiosk: router, rotation state, timers and collaborators.
pub struct Kiosk<R: Renderer> {
    config: Arc<Config>,
    router: Router,
    source: Arc<dyn FeedSource>,
    store: Arc<dyn IndexStore>,
    renderer: R,

    facts: FeedRotation<FactEntry>,
    need_to_know: FeedRotation<NeedToKnowEntry>,
    fav_quotes: FeedRotation<QuoteEntry>,
    hacker_quotes: FeedRotation<QuoteEntry>,

    intro_deadline: Option<Instant>,
    rotation_deadline: Option<Instant>,
    pending_fetch: Option<JoinHandle<FetchOutcome>>,
}

impl<R: Renderer> Kiosk<R> {
    pub fn new(
        config: Arc<Config>,
        source: Arc<dyn FeedSource>,
        store: Arc<dyn IndexStore>,
        renderer: R,
    ) -> Self {
        let router = Router::new(&config);
        Self {
            config,
            router,
            source,
            store,
            renderer,
            facts: FeedRotation::new(),
            need_to_know: FeedRotation::new(),
            fav_quotes: FeedRotation::new(),
            hacker_quotes: FeedRotation::new(),
            intro_deadline: None,
            rotation_deadline: None,
            pending_fetch: None,
        }
    }

    pub fn state(&self) -> &RouterState {
        self.router.state()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// A navigation: the fragment changed, or the session just started.
    pub async fn navigate(&mut self, fragment: Option<&str>) {
        log::info!("Navigating to {:?}", fragment.unwrap_or("<intro>"));
        let commands = self.router.on_fragment(fragment);
        self.execute(commands).await;
    }

    /// A user-initiated reload of the displayed entry.
    pub async fn reload(&mut self) {
        let fragment = match self.router.state() {
            RouterState::Displayed { fragment } => fragment.clone(),
            _ => return,
        };
        match FeedKind::from_fragment(&fragment) {
            Some(FeedKind::Facts) => {
                self.facts.advance();
                self.show_facts().await;
            }
            Some(FeedKind::NeedToKnow) => {
                self.need_to_know.advance();
                self.show_need_to_know().await;
            }
            Some(FeedKind::FavQuotes) => {
                self.fav_quotes.advance_distinct(quote_signature);
                self.show_fav_quote();
            }
            _ => {}
        }
    }

    /// Wait for the next internal event (timer or fetch completion) and
    /// handle it. Pends forever when nothing is outstanding.
    pub async fn idle(&mut self) {
        let event = {
            let intro = sleep_until_opt(self.intro_deadline);
            let rotation = sleep_until_opt(self.rotation_deadline);
            let fetch = join_fetch(&mut self.pending_fetch);
            tokio::pin!(intro, rotation, fetch);
            tokio::select! {
                _ = &mut intro => Event::IntroElapsed,
                _ = &mut rotation => Event::RotationElapsed,
                outcome = &mut fetch => Event::FetchDone(outcome),
            }
        };

        match event {
            Event::IntroElapsed => {
                self.intro_deadline = None;
                let commands = self.router.on_intro_elapsed();
                self.execute(commands).await;
            }
            Event::RotationElapsed => {
                self.rotation_deadline = None;
                self.show_hacker_quote();
            }
            Event::FetchDone(outcome) => {
                self.pending_fetch = None;
                self.on_fetch_done(outcome).await;
            }
        }
    }

    /// Drive the loop until the router settles in a displayed or terminal
    /// state.
    pub async fn settle(&mut self) {
        while matches!(
            self.router.state(),
            RouterState::Intro | RouterState::Loading { .. }
        ) {
            self.idle().await;
        }
    }

    async fn on_fetch_done(&mut self, outcome: FetchOutcome) {
        match outcome.result {
            Ok(data) => match self.router.on_fetch_succeeded(outcome.generation) {
                Some(fragment) => self.dispatch(&fragment, data).await,
                None => log::debug!("Discarding stale fetch for '{}'", outcome.fragment),
            },
            Err(e) => {
                log::error!("Error loading content for '{}': {}", outcome.fragment, e);
                let commands = self.router.on_fetch_failed(outcome.generation);
                self.execute(commands).await;
            }
        }
    }

    async fn execute(&mut self, commands: Vec<Command>) {
        let mut queue = std::collections::VecDeque::from(commands);
        while let Some(command) = queue.pop_front() {
            match command {
                Command::Render(view) => self.renderer.render(&view),
                Command::StartIntroTimer(duration) => {
                    self.intro_deadline = Some(Instant::now() + duration);
                }
                Command::CancelIntroTimer => self.intro_deadline = None,
                Command::CancelRotationTimer => self.rotation_deadline = None,
                Command::SetFragment(fragment) => {
                    // observable navigation, runs through the same entry
                    // point a fragment change would
                    queue.extend(self.router.on_fragment(Some(&fragment)));
                }
                Command::Fetch {
                    fragment,
                    generation,
                } => self.spawn_fetch(fragment, generation),
            }
        }
    }

    fn spawn_fetch(&mut self, fragment: String, generation: u64) {
        let source = Arc::clone(&self.source);
        let transition = Duration::from_millis(self.config.kiosk.transition_ms);
        // a superseded handle is simply dropped; its generation would not
        // match anyway
        self.pending_fetch = Some(tokio::spawn(async move {
            tokio::time::sleep(transition).await;
            let result = load_feed(source.as_ref(), &fragment).await;
            FetchOutcome {
                generation,
                fragment,
                result,
            }
        }));
    }

    /// Route parsed feed data to its rotation controller or derived view.
    async fn dispatch(&mut self, fragment: &str, data: FeedData) {
        let labels = &self.config.labels;
        match data {
            FeedData::Holiday(entries) => {
                let view = views::holiday_view(labels, date::today(), &entries);
                self.renderer.render(&view);
            }
            FeedData::Events(days) => {
                let view = views::events_view(labels, date::today(), &days);
                self.renderer.render(&view);
            }
            FeedData::Quotes(quotes) if fragment == FeedKind::HackerQuotes.name() => {
                self.hacker_quotes.set_cache(quotes);
                self.show_hacker_quote();
            }
            FeedData::Quotes(quotes) => {
                self.fav_quotes.set_cache(quotes);
                self.fav_quotes
                    .select_daily(date::day_of_year(date::today()));
                self.show_fav_quote();
            }
            FeedData::Facts(entries) => {
                self.facts.set_cache(entries);
                let stored = self.read_index(FeedKind::Facts).await;
                self.facts.select_persisted(stored);
                self.show_facts().await;
            }
            FeedData::NeedToKnow(entries) => {
                self.need_to_know.set_cache(entries);
                let stored = self.read_index(FeedKind::NeedToKnow).await;
                self.need_to_know.select_persisted(stored);
                self.show_need_to_know().await;
            }
            FeedData::Other(value) => {
                let view = views::generic_view(labels, fragment, &value);
                self.renderer.render(&view);
            }
        }
    }

    async fn read_index(&self, kind: FeedKind) -> Option<u64> {
        let key = kind.store_key()?;
        self.store.read(key).await
    }

    async fn persist_index(&self, kind: FeedKind, index: Option<usize>) {
        let (Some(key), Some(index)) = (kind.store_key(), index) else {
            return;
        };
        self.store.write(key, index as u64).await;
    }

    async fn show_facts(&mut self) {
        let labels = &self.config.labels;
        let view = self
            .facts
            .current()
            .and_then(|entry| views::fact_view(labels, entry))
            .unwrap_or_else(|| views::fallback_card(labels, FeedKind::Facts.name()));
        self.persist_index(FeedKind::Facts, self.facts.current_index())
            .await;
        self.renderer.render(&view);
    }

    async fn show_need_to_know(&mut self) {
        let labels = &self.config.labels;
        let view = self
            .need_to_know
            .current()
            .and_then(|entry| views::need_to_know_view(labels, entry))
            .unwrap_or_else(|| views::fallback_card(labels, FeedKind::NeedToKnow.name()));
        self.persist_index(FeedKind::NeedToKnow, self.need_to_know.current_index())
            .await;
        self.renderer.render(&view);
    }

    fn show_fav_quote(&mut self) {
        let labels = &self.config.labels;
        let view = self
            .fav_quotes
            .current()
            .map(|entry| views::fav_quote_view(labels, entry))
            .unwrap_or_else(|| views::fallback_card(labels, FeedKind::FavQuotes.name()));
        self.renderer.render(&view);
    }

    /// Show the quote for the current time slot and schedule the re-render
    /// at the next slot boundary, so the display advances while the page
    /// stays open without polling.
    fn show_hacker_quote(&mut self) {
        let labels = &self.config.labels;
        let slot_ms = self.config.kiosk.slot_ms();
        let now_ms = date::now_ms();

        let view = self
            .hacker_quotes
            .select_slot(now_ms, slot_ms)
            .map(|entry| views::hacker_quote_view(labels, entry))
            .unwrap_or_else(|| views::fallback_card(labels, FeedKind::HackerQuotes.name()));
        self.renderer.render(&view);

        if !self.hacker_quotes.is_empty() {
            let delay = ms_until_next_slot(now_ms, slot_ms) + self.config.kiosk.slot_epsilon_ms;
            self.rotation_deadline = Some(Instant::now() + Duration::from_millis(delay));
        }
    }

    #[cfg(test)]
    fn rotation_scheduled(&self) -> bool {
        self.rotation_deadline.is_some()
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn join_fetch(pending: &mut Option<JoinHandle<FetchOutcome>>) -> FetchOutcome {
    match pending {
        Some(handle) => match handle.await {
            Ok(outcome) => outcome,
            // a panicked fetch task reports as generation 0, which is
            // never current
            Err(e) => FetchOutcome {
                generation: 0,
                fragment: String::new(),
                result: Err(crate::error::AppError::feed("<join>", e)),
            },
        },
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, View};
    use crate::render::RecordingRenderer;
    use crate::services::DirFeedSource;
    use crate::storage::MemoryIndexStore;
    use tempfile::TempDir;

    fn test_config() -> Arc<Config> {
        let mut config = Config::default();
        config.kiosk.intro_ms = 1;
        config.kiosk.transition_ms = 0;
        Arc::new(config)
    }

    fn write_feed(root: &std::path::Path, name: &str, content: &str) {
        let dir = root.join("data");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{name}.json")), content).unwrap();
    }

    fn kiosk_at(
        root: &std::path::Path,
        store: Arc<MemoryIndexStore>,
    ) -> Kiosk<RecordingRenderer> {
        Kiosk::new(
            test_config(),
            Arc::new(DirFeedSource::new(root)),
            store,
            RecordingRenderer::new(),
        )
    }

    fn card_headline(view: &View) -> &str {
        match view {
            View::Card(Card {
                headline: Some(headline),
                ..
            }) => headline,
            other => panic!("expected card with headline, got {other:?}"),
        }
    }

    const FIVE_FACTS: &str = r#"[
        {"headline": "F0", "text": "T0"},
        {"headline": "F1", "text": "T1"},
        {"headline": "F2", "text": "T2"},
        {"headline": "F3", "text": "T3"},
        {"headline": "F4", "text": "T4"}
    ]"#;

    #[tokio::test]
    async fn test_facts_first_load_picks_random_start_and_persists() {
        let tmp = TempDir::new().unwrap();
        write_feed(tmp.path(), "facts", FIVE_FACTS);
        let store = Arc::new(MemoryIndexStore::new());

        let mut kiosk = kiosk_at(tmp.path(), Arc::clone(&store));
        kiosk.navigate(Some("facts")).await;
        kiosk.settle().await;

        let stored = store.read("facts.index").await.expect("index persisted");
        assert!(stored < 5);
        let last = kiosk.renderer().last().unwrap();
        assert_eq!(card_headline(last), format!("F{stored}"));
    }

    #[tokio::test]
    async fn test_facts_next_session_shows_successor_of_stored() {
        let tmp = TempDir::new().unwrap();
        write_feed(tmp.path(), "facts", FIVE_FACTS);
        let store = Arc::new(MemoryIndexStore::new());
        store.write("facts.index", 3).await;

        let mut kiosk = kiosk_at(tmp.path(), Arc::clone(&store));
        kiosk.navigate(Some("facts")).await;
        kiosk.settle().await;

        assert_eq!(card_headline(kiosk.renderer().last().unwrap()), "F4");
        assert_eq!(store.read("facts.index").await, Some(4));

        // wraps on the next session
        let mut kiosk = kiosk_at(tmp.path(), Arc::clone(&store));
        kiosk.navigate(Some("facts")).await;
        kiosk.settle().await;
        assert_eq!(card_headline(kiosk.renderer().last().unwrap()), "F0");
        assert_eq!(store.read("facts.index").await, Some(0));
    }

    #[tokio::test]
    async fn test_facts_stale_stored_index_never_panics() {
        let tmp = TempDir::new().unwrap();
        write_feed(tmp.path(), "facts", FIVE_FACTS);
        let store = Arc::new(MemoryIndexStore::new());
        store.write("facts.index", 9000).await;

        let mut kiosk = kiosk_at(tmp.path(), Arc::clone(&store));
        kiosk.navigate(Some("facts")).await;
        kiosk.settle().await;

        let stored = store.read("facts.index").await.unwrap();
        assert!(stored < 5);
    }

    #[tokio::test]
    async fn test_facts_reload_advances_and_repersists() {
        let tmp = TempDir::new().unwrap();
        write_feed(tmp.path(), "facts", FIVE_FACTS);
        let store = Arc::new(MemoryIndexStore::new());
        store.write("facts.index", 0).await;

        let mut kiosk = kiosk_at(tmp.path(), Arc::clone(&store));
        kiosk.navigate(Some("facts")).await;
        kiosk.settle().await;
        assert_eq!(store.read("facts.index").await, Some(1));

        kiosk.reload().await;
        assert_eq!(store.read("facts.index").await, Some(2));
        assert_eq!(card_headline(kiosk.renderer().last().unwrap()), "F2");
    }

    #[tokio::test]
    async fn test_homogeneous_fav_quotes_reload_terminates() {
        let tmp = TempDir::new().unwrap();
        write_feed(
            tmp.path(),
            "favquotes",
            r#"[
                {"quote": "Same", "person": "P"},
                {"quote": "Same", "person": "P"},
                {"quote": "Same", "person": "P"}
            ]"#,
        );

        let mut kiosk = kiosk_at(tmp.path(), Arc::new(MemoryIndexStore::new()));
        kiosk.navigate(Some("favquotes")).await;
        kiosk.settle().await;
        let shown = kiosk.renderer().last().unwrap().clone();

        for _ in 0..5 {
            kiosk.reload().await;
            assert_eq!(kiosk.renderer().last().unwrap(), &shown);
        }
    }

    #[tokio::test]
    async fn test_fav_quotes_reload_skips_normalized_duplicates() {
        let tmp = TempDir::new().unwrap();
        write_feed(
            tmp.path(),
            "favquotes",
            r#"[
                {"quote": "EN: Alpha (EN #1)", "person": "P"},
                {"quote": "Alpha", "person": "P"},
                {"quote": "Beta", "person": "P"}
            ]"#,
        );

        let mut kiosk = kiosk_at(tmp.path(), Arc::new(MemoryIndexStore::new()));
        kiosk.navigate(Some("favquotes")).await;
        kiosk.settle().await;

        // entries 0 and 1 normalize identically, so every reload must land
        // on the other normalized text
        let normalized_body = |view: &View| {
            let View::Card(card) = view else {
                panic!("expected card");
            };
            crate::utils::text::normalize_quote_text(
                card.body.as_deref().unwrap().trim_matches(['„', '“']),
            )
        };
        let mut previous = normalized_body(kiosk.renderer().last().unwrap());
        for _ in 0..4 {
            kiosk.reload().await;
            let current = normalized_body(kiosk.renderer().last().unwrap());
            assert_ne!(current, previous);
            previous = current;
        }
    }

    #[tokio::test]
    async fn test_missing_holiday_twice_renders_unavailable() {
        let tmp = TempDir::new().unwrap();
        // no holiday.json at all
        let mut kiosk = kiosk_at(tmp.path(), Arc::new(MemoryIndexStore::new()));
        kiosk.navigate(None).await;
        kiosk.settle().await;

        assert_eq!(kiosk.state(), &RouterState::Stuck);
        assert!(matches!(
            kiosk.renderer().last().unwrap(),
            View::Unavailable { .. }
        ));

        // two intros were shown before giving up, never a third
        let intros = kiosk
            .renderer()
            .views()
            .iter()
            .filter(|v| matches!(v, View::Intro { .. }))
            .count();
        assert_eq!(intros, 2);
    }

    #[tokio::test]
    async fn test_stuck_recovers_on_new_navigation() {
        let tmp = TempDir::new().unwrap();
        write_feed(tmp.path(), "facts", FIVE_FACTS);

        let mut kiosk = kiosk_at(tmp.path(), Arc::new(MemoryIndexStore::new()));
        kiosk.navigate(None).await;
        kiosk.settle().await;
        assert_eq!(kiosk.state(), &RouterState::Stuck);

        kiosk.navigate(Some("facts")).await;
        kiosk.settle().await;
        assert!(matches!(
            kiosk.state(),
            RouterState::Displayed { .. }
        ));
    }

    #[tokio::test]
    async fn test_hacker_quotes_schedule_slot_rerender() {
        let tmp = TempDir::new().unwrap();
        write_feed(
            tmp.path(),
            "hackerquotes",
            r#"[{"quote": "Q0", "character": "C"}, {"quote": "Q1", "character": "C"}]"#,
        );

        let mut kiosk = kiosk_at(tmp.path(), Arc::new(MemoryIndexStore::new()));
        kiosk.navigate(Some("hackerquotes")).await;
        kiosk.settle().await;

        assert!(matches!(kiosk.renderer().last().unwrap(), View::Card(_)));
        assert!(kiosk.rotation_scheduled());

        // navigating away cancels the pending slot re-render
        write_feed(tmp.path(), "misc", r#"{"content": "x"}"#);
        kiosk.navigate(Some("misc")).await;
        assert!(!kiosk.rotation_scheduled());
    }

    #[tokio::test]
    async fn test_empty_feed_renders_fallback_card() {
        let tmp = TempDir::new().unwrap();
        write_feed(tmp.path(), "facts", "[]");

        let mut kiosk = kiosk_at(tmp.path(), Arc::new(MemoryIndexStore::new()));
        kiosk.navigate(Some("facts")).await;
        kiosk.settle().await;

        let View::Card(card) = kiosk.renderer().last().unwrap() else {
            panic!("expected fallback card");
        };
        assert_eq!(card.body.as_deref(), Some("Inhalt konnte nicht geladen werden."));
    }

    #[tokio::test]
    async fn test_superseded_navigation_never_renders_stale_feed() {
        let tmp = TempDir::new().unwrap();
        write_feed(tmp.path(), "facts", FIVE_FACTS);
        write_feed(tmp.path(), "misc", r#"{"content": "fresh"}"#);

        let mut kiosk = kiosk_at(tmp.path(), Arc::new(MemoryIndexStore::new()));
        // second navigation supersedes the first before its fetch lands
        kiosk.navigate(Some("facts")).await;
        kiosk.navigate(Some("misc")).await;
        kiosk.settle().await;

        let View::Card(card) = kiosk.renderer().last().unwrap() else {
            panic!("expected card");
        };
        assert_eq!(card.body.as_deref(), Some("fresh"));
    }
}
