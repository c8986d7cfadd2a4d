//! Result-set acquisition and the live result-list screen.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::card::CardRecord;
use crate::config_file::DisplayFieldSelection;
use crate::criteria::SearchCriteria;
use crate::events::{DetailRequest, Navigation, Notification, ScreenEvent};
use crate::glyph::{BraceGlyphs, GlyphFormatter};
use crate::presenter::{self, RarityPalette, RowContext, RowView};
use crate::result_set::ResultSet;
use crate::scroll::{ListViewport, ScrollAnchor};
use crate::section_index::AlphabetIndex;
use crate::shuffle;
use crate::store::{CardStore, StoreError};

/// What the screen was opened with.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultQuery {
    /// Exactly three printings, shown in this order.
    Merge([i64; 3]),
    Search(SearchCriteria),
}

/// Per-screen settings, read once when the screen is entered.
#[derive(Clone)]
pub struct ScreenContext {
    pub fields: DisplayFieldSelection,
    pub palette: RarityPalette,
    pub glyphs: Arc<dyn GlyphFormatter>,
    /// Whether the result list is the first screen of the flow.
    pub is_stack_root: bool,
}

impl ScreenContext {
    pub fn new(fields: DisplayFieldSelection) -> Self {
        Self {
            fields,
            palette: RarityPalette::default(),
            glyphs: Arc::new(BraceGlyphs),
            is_stack_root: false,
        }
    }

    pub fn with_stack_root(mut self, is_stack_root: bool) -> Self {
        self.is_stack_root = is_stack_root;
        self
    }

    fn back(&self) -> Navigation {
        if self.is_stack_root {
            Navigation::Finish
        } else {
            Navigation::PopBack
        }
    }
}

/// Result of entering the screen.
pub enum EntryOutcome {
    /// The screen was torn down before the store answered.
    Cancelled,
    /// The store failed; the host has been told and navigated away.
    Aborted,
    /// Nothing matched; the host has navigated away.
    Empty,
    /// One match; the detail viewer was opened directly.
    Single(ResultListScreen),
    /// Several matches; render the list.
    List(ResultListScreen),
}

impl std::fmt::Debug for EntryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "Cancelled"),
            Self::Aborted => write!(f, "Aborted"),
            Self::Empty => write!(f, "Empty"),
            Self::Single(s) => write!(f, "Single({})", s.len()),
            Self::List(s) => write!(f, "List({})", s.len()),
        }
    }
}

fn emit(events: &mpsc::UnboundedSender<ScreenEvent>, event: ScreenEvent) {
    if events.send(event).is_err() {
        tracing::debug!("screen host is gone, dropping event");
    }
}

async fn fetch<S: CardStore>(store: &S, query: &ResultQuery) -> Result<Vec<CardRecord>, StoreError> {
    match query {
        ResultQuery::Merge(ids) => {
            let mut out = Vec::with_capacity(ids.len());
            for &id in ids {
                match store.fetch_by_id(id).await? {
                    Some(card) => out.push(card),
                    None => tracing::debug!(id, "merge id not in store, skipping"),
                }
            }
            Ok(out)
        }
        ResultQuery::Search(criteria) => store.search(criteria).await,
    }
}

/// Enter the result list: query the store once and route on the result size.
///
/// `store` is owned by this call and dropped before it returns, whatever the
/// outcome. `cancel` is the screen's lifetime; cancelling it abandons the
/// query without emitting any events.
pub async fn enter<S: CardStore>(
    store: S,
    query: ResultQuery,
    ctx: ScreenContext,
    cancel: &CancellationToken,
    events: mpsc::UnboundedSender<ScreenEvent>,
) -> EntryOutcome {
    tracing::debug!(store = store.name(), ?query, "querying record store");

    let fetched = tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        res = fetch(&store, &query) => Some(res),
    };
    tracing::debug!(store = store.name(), "releasing record store");
    drop(store);

    let records = match fetched {
        None => {
            tracing::debug!("screen cancelled before results arrived");
            return EntryOutcome::Cancelled;
        }
        Some(Err(e)) => {
            tracing::warn!(error = %e, "record store unavailable");
            emit(&events, ScreenEvent::Notify(Notification::StoreFailure));
            emit(&events, ScreenEvent::Navigate(ctx.back()));
            return EntryOutcome::Aborted;
        }
        Some(Ok(records)) => records,
    };

    let results = ResultSet::new(records);
    tracing::info!(count = results.len(), "result set ready");

    match results.len() {
        0 => {
            emit(&events, ScreenEvent::Notify(Notification::NoResults));
            emit(&events, ScreenEvent::Navigate(ctx.back()));
            EntryOutcome::Empty
        }
        1 => {
            let screen = ResultListScreen::new(results, ScrollAnchor::default(), ctx, events);
            screen.select_position(0);
            EntryOutcome::Single(screen)
        }
        n => {
            emit(&events, ScreenEvent::Notify(Notification::ResultCount(n)));
            EntryOutcome::List(ResultListScreen::new(
                results,
                ScrollAnchor::default(),
                ctx,
                events,
            ))
        }
    }
}

/// What survives a transient teardown of the screen (e.g. re-creation).
#[derive(Debug, Clone)]
pub struct SavedScreen {
    pub results: ResultSet,
    pub anchor: ScrollAnchor,
}

/// A result list that has its results and is ready to render.
pub struct ResultListScreen {
    results: ResultSet,
    index: AlphabetIndex,
    anchor: ScrollAnchor,
    ctx: ScreenContext,
    events: mpsc::UnboundedSender<ScreenEvent>,
}

impl ResultListScreen {
    fn new(
        results: ResultSet,
        anchor: ScrollAnchor,
        ctx: ScreenContext,
        events: mpsc::UnboundedSender<ScreenEvent>,
    ) -> Self {
        let index = AlphabetIndex::new(results.names());
        Self {
            results,
            index,
            anchor,
            ctx,
            events,
        }
    }

    /// Re-create a screen from saved state without querying the store again.
    pub fn from_saved(
        saved: SavedScreen,
        ctx: ScreenContext,
        events: mpsc::UnboundedSender<ScreenEvent>,
    ) -> Self {
        Self::new(saved.results, saved.anchor, ctx, events)
    }

    pub fn into_saved(self) -> SavedScreen {
        SavedScreen {
            results: self.results,
            anchor: self.anchor,
        }
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn anchor(&self) -> ScrollAnchor {
        self.anchor
    }

    pub fn section_index(&self) -> &AlphabetIndex {
        &self.index
    }

    fn row_context(&self) -> RowContext<'_> {
        RowContext {
            fields: self.ctx.fields,
            glyphs: self.ctx.glyphs.as_ref(),
            palette: self.ctx.palette,
        }
    }

    /// Bind every result into `rows`, reusing the rows already there.
    pub fn render_into(&self, rows: &mut Vec<RowView>) {
        let ctx = self.row_context();
        rows.truncate(self.results.len());
        for (i, card) in self.results.iter().enumerate() {
            match rows.get_mut(i) {
                Some(row) => presenter::bind(row, card, &ctx),
                None => rows.push(presenter::present(card, &ctx)),
            }
        }
    }

    /// One row per result, in result order.
    pub fn rows(&self) -> Vec<RowView> {
        let mut rows = Vec::with_capacity(self.results.len());
        self.render_into(&mut rows);
        rows
    }

    /// Remember where the list was scrolled to.
    pub fn suspend(&mut self, viewport: &impl ListViewport) {
        self.anchor = ScrollAnchor::capture(viewport);
        tracing::trace!(anchor = ?self.anchor, "captured scroll anchor");
    }

    /// Render the rows and put the list back where it was.
    pub fn resume(&self, viewport: &mut impl ListViewport) -> Vec<RowView> {
        let rows = self.rows();
        self.anchor.restore(viewport);
        rows
    }

    fn open_detail(&self, request: DetailRequest) -> DetailRequest {
        tracing::debug!(count = request.ids.len(), start = request.start, "opening detail viewer");
        emit(
            &self.events,
            ScreenEvent::Navigate(Navigation::ShowDetail(request.clone())),
        );
        request
    }

    /// Open the card at list position `position`. The viewer starts at that
    /// row even when the same id appears more than once.
    pub fn select_position(&self, position: usize) -> Option<DetailRequest> {
        self.results.get(position)?;
        Some(self.open_detail(DetailRequest {
            ids: self.results.ids(),
            start: position,
        }))
    }

    /// Open card `id`, paging through every result in list order.
    pub fn select_id(&self, id: i64) -> DetailRequest {
        let start = self.results.position_of(id).unwrap_or(0);
        self.open_detail(DetailRequest {
            ids: self.results.ids(),
            start,
        })
    }

    /// Open a random card: page through all results in shuffled order.
    pub fn select_random(&self) -> DetailRequest {
        self.select_random_with(&mut shuffle::time_seeded_rng())
    }

    pub fn select_random_with(&self, rng: &mut fastrand::Rng) -> DetailRequest {
        let mut ids = self.results.ids();
        shuffle::fisher_yates(&mut ids, rng);
        self.open_detail(DetailRequest { ids, start: 0 })
    }

    /// Called when the detail viewer returns to this screen.
    ///
    /// A single-result screen was never shown, so it steps back past itself.
    /// Returns whether it navigated away.
    pub fn on_return_from_detail(&self) -> bool {
        if self.results.len() == 1 {
            emit(&self.events, ScreenEvent::Navigate(self.ctx.back()));
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::card::{Rarity, Stat};
    use crate::scroll::FixedRowViewport;
    use crate::store::mock::MockCardStore;

    fn cards(names: &[&str]) -> Vec<CardRecord> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| CardRecord::new(100 + i as i64, *n, "LEA", Rarity::Common))
            .collect()
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ScreenEvent>) -> Vec<ScreenEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev);
        }
        out
    }

    async fn enter_with(
        store: MockCardStore,
        ctx: ScreenContext,
    ) -> (EntryOutcome, Vec<ScreenEvent>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let outcome = enter(
            store,
            ResultQuery::Search(SearchCriteria::default()),
            ctx,
            &cancel,
            tx,
        )
        .await;
        (outcome, drain(&mut rx))
    }

    fn ctx() -> ScreenContext {
        ScreenContext::new(DisplayFieldSelection::default())
    }

    #[tokio::test]
    async fn empty_result_pops_back() {
        let (outcome, events) = enter_with(MockCardStore::new(vec![]), ctx()).await;
        assert!(matches!(outcome, EntryOutcome::Empty));
        assert_eq!(
            events,
            vec![
                ScreenEvent::Notify(Notification::NoResults),
                ScreenEvent::Navigate(Navigation::PopBack),
            ]
        );
    }

    #[tokio::test]
    async fn empty_result_at_root_finishes() {
        let (_, events) =
            enter_with(MockCardStore::new(vec![]), ctx().with_stack_root(true)).await;
        assert_eq!(events[1], ScreenEvent::Navigate(Navigation::Finish));
    }

    #[tokio::test]
    async fn single_result_goes_straight_to_detail() {
        let (outcome, events) = enter_with(MockCardStore::new(cards(&["Ant"])), ctx()).await;
        assert!(matches!(outcome, EntryOutcome::Single(_)));
        assert_eq!(
            events,
            vec![ScreenEvent::Navigate(Navigation::ShowDetail(DetailRequest {
                ids: vec![100],
                start: 0,
            }))]
        );
    }

    #[tokio::test]
    async fn single_result_steps_back_after_detail() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let outcome = enter(
            MockCardStore::new(cards(&["Ant"])),
            ResultQuery::Search(SearchCriteria::default()),
            ctx(),
            &CancellationToken::new(),
            tx,
        )
        .await;
        let EntryOutcome::Single(screen) = outcome else {
            panic!("expected single result");
        };
        drain(&mut rx);
        assert!(screen.on_return_from_detail());
        assert_eq!(drain(&mut rx), vec![ScreenEvent::Navigate(Navigation::PopBack)]);
    }

    #[tokio::test]
    async fn many_results_report_count_and_keep_order() {
        let (outcome, events) =
            enter_with(MockCardStore::new(cards(&["Cat", "Ant", "Bear"])), ctx()).await;
        assert_eq!(events, vec![ScreenEvent::Notify(Notification::ResultCount(3))]);
        let EntryOutcome::List(screen) = outcome else {
            panic!("expected list");
        };
        let names: Vec<String> = screen.rows().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Cat", "Ant", "Bear"]);
        assert!(!screen.on_return_from_detail());
    }

    #[tokio::test]
    async fn store_failure_aborts_entry() {
        let store = MockCardStore::unavailable();
        let (outcome, events) = enter_with(store, ctx()).await;
        assert!(matches!(outcome, EntryOutcome::Aborted));
        assert_eq!(
            events,
            vec![
                ScreenEvent::Notify(Notification::StoreFailure),
                ScreenEvent::Navigate(Navigation::PopBack),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_abandons_slow_query() {
        let store = MockCardStore::new(cards(&["Ant", "Bear"])).with_delay(Duration::from_secs(30));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });
        let outcome = enter(
            store,
            ResultQuery::Search(SearchCriteria::default()),
            ctx(),
            &cancel,
            tx,
        )
        .await;
        assert!(matches!(outcome, EntryOutcome::Cancelled));
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn merge_fetches_three_ids_in_order() {
        let store = MockCardStore::new(cards(&["Ant", "Bear", "Cat"]));
        let (tx, _rx) = mpsc::unbounded_channel();
        let outcome = enter(
            store,
            ResultQuery::Merge([102, 100, 101]),
            ctx(),
            &CancellationToken::new(),
            tx,
        )
        .await;
        let EntryOutcome::List(screen) = outcome else {
            panic!("expected list");
        };
        assert_eq!(screen.results().ids(), vec![102, 100, 101]);
    }

    #[tokio::test]
    async fn store_is_queried_once_and_released() {
        let store = MockCardStore::new(cards(&["Ant", "Bear"]));
        let calls = store.call_counter();
        let (outcome, _) = enter_with(store, ctx()).await;
        assert!(matches!(outcome, EntryOutcome::List(_)));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(Arc::strong_count(&calls), 1);
    }

    #[tokio::test]
    async fn failed_store_is_released_too() {
        let store = MockCardStore::unavailable();
        let calls = store.call_counter();
        let (outcome, _) = enter_with(store, ctx()).await;
        assert!(matches!(outcome, EntryOutcome::Aborted));
        assert_eq!(Arc::strong_count(&calls), 1);
    }

    #[tokio::test]
    async fn repeated_merge_id_opens_the_chosen_row() {
        let store = MockCardStore::new(cards(&["Ant"]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let outcome = enter(
            store,
            ResultQuery::Merge([100, 100, 100]),
            ctx(),
            &CancellationToken::new(),
            tx,
        )
        .await;
        let EntryOutcome::List(screen) = outcome else {
            panic!("expected list");
        };
        drain(&mut rx);

        let req = screen.select_position(2).unwrap();
        assert_eq!(req.ids, vec![100, 100, 100]);
        assert_eq!(req.start, 2);
        assert_eq!(
            drain(&mut rx),
            vec![ScreenEvent::Navigate(Navigation::ShowDetail(req))]
        );
        assert_eq!(screen.select_id(100).start, 0);
    }

    #[tokio::test]
    async fn merge_skips_unknown_ids() {
        let store = MockCardStore::new(cards(&["Ant", "Bear"]));
        let (tx, _rx) = mpsc::unbounded_channel();
        let outcome = enter(
            store,
            ResultQuery::Merge([100, 999, 101]),
            ctx(),
            &CancellationToken::new(),
            tx,
        )
        .await;
        assert!(matches!(outcome, EntryOutcome::List(ref s) if s.len() == 2));
    }

    async fn list_screen(names: &[&str]) -> (ResultListScreen, mpsc::UnboundedReceiver<ScreenEvent>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let outcome = enter(
            MockCardStore::new(cards(names)),
            ResultQuery::Search(SearchCriteria::default()),
            ctx(),
            &CancellationToken::new(),
            tx,
        )
        .await;
        drain(&mut rx);
        match outcome {
            EntryOutcome::List(screen) => (screen, rx),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn explicit_selection_starts_at_chosen_card() {
        let (screen, mut rx) = list_screen(&["Ant", "Bear", "Cat"]).await;
        let req = screen.select_position(1).unwrap();
        assert_eq!(req.ids, vec![100, 101, 102]);
        assert_eq!(req.start, 1);
        assert_eq!(req.current(), Some(101));
        assert_eq!(
            drain(&mut rx),
            vec![ScreenEvent::Navigate(Navigation::ShowDetail(req))]
        );
        assert!(screen.select_position(3).is_none());
    }

    #[tokio::test]
    async fn random_selection_is_seeded_shuffle_from_zero() {
        let (screen, _rx) = list_screen(&["Ant", "Bear", "Cat", "Dog", "Eel"]).await;
        let a = screen.select_random_with(&mut fastrand::Rng::with_seed(5));
        let b = screen.select_random_with(&mut fastrand::Rng::with_seed(5));
        assert_eq!(a, b);
        assert_eq!(a.start, 0);
        let mut sorted = a.ids.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![100, 101, 102, 103, 104]);

        let unseeded = screen.select_random();
        assert_eq!(unseeded.ids.len(), 5);
    }

    #[tokio::test]
    async fn suspend_resume_restores_scroll() {
        let names: Vec<String> = (0..50).map(|i| format!("Card {i:02}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (mut screen, _rx) = list_screen(&refs).await;

        let mut viewport = FixedRowViewport::new(20, 200, screen.len());
        viewport.scroll_by(437);
        screen.suspend(&viewport);

        let mut recreated = FixedRowViewport::new(20, 200, screen.len());
        let rows = screen.resume(&mut recreated);
        assert_eq!(rows.len(), 50);
        assert_eq!(recreated.first_visible_position(), 21);
        assert_eq!(recreated.scroll_offset(), 437);
    }

    #[tokio::test]
    async fn saved_state_survives_recreation() {
        let (mut screen, _rx) = list_screen(&["Ant", "Bear", "Cat"]).await;
        let mut viewport = FixedRowViewport::new(50, 100, 3);
        viewport.scroll_by(60);
        screen.suspend(&viewport);
        let anchor = screen.anchor();

        let (tx, _rx2) = mpsc::unbounded_channel();
        let restored = ResultListScreen::from_saved(screen.into_saved(), ctx(), tx);
        assert_eq!(restored.anchor(), anchor);
        assert_eq!(restored.results().ids(), vec![100, 101, 102]);
    }

    #[tokio::test]
    async fn render_into_recycles_rows() {
        let mut records = cards(&["Ant", "Bear"]);
        records[0].power = Stat::Value(1.0);
        records[0].toughness = Stat::Value(1.0);
        let (tx, _rx) = mpsc::unbounded_channel();
        let EntryOutcome::List(screen) = enter(
            MockCardStore::new(records),
            ResultQuery::Search(SearchCriteria::default()),
            ctx(),
            &CancellationToken::new(),
            tx,
        )
        .await
        else {
            panic!("expected list");
        };

        // Stale rows: swapped order and an extra row.
        let mut rows = screen.rows();
        rows.reverse();
        let extra = rows[0].clone();
        rows.push(extra);
        screen.render_into(&mut rows);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].power_toughness_visible());
        assert!(!rows[1].power_toughness_visible());
    }

    #[tokio::test]
    async fn section_index_tracks_results() {
        let (screen, _rx) = list_screen(&["Ant", "Bear", "Cat"]).await;
        assert_eq!(screen.section_index().position_for_section(0), 0);
        assert_eq!(screen.section_index().section_for_position(2), 2);
    }
}
