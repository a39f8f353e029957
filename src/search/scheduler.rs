use super::query::{build_query, FacultyFilters, Pagination, QueryParams};
use crate::api::types::{FacultyPage, FacultyRow};
use crate::api::ApiError;
use crate::catalog::Subject;
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Anything that can answer a faculty search.
pub trait FacultySource: Clone + Send + Sync + 'static {
    fn fetch(&self, params: QueryParams) -> BoxFuture<'static, Result<FacultyPage, ApiError>>;
}

struct Request {
    generation: u64,
    params: QueryParams,
}

struct Outcome {
    generation: u64,
    result: Result<FacultyPage, ApiError>,
}

/// Faculty search session: debounced filter edits, immediate paging, one
/// request in flight, stale responses dropped by generation.
pub struct FacultySearch {
    filters: FacultyFilters,
    subjects: Vec<Subject>,
    pagination: Pagination,
    debounce: Duration,
    generation: u64,
    latest: Arc<AtomicU64>,
    timer: Option<JoinHandle<()>>,
    requests: mpsc::UnboundedSender<Request>,
    outcomes: mpsc::UnboundedReceiver<Outcome>,
    rows: Vec<FacultyRow>,
    loading: bool,
    error: Option<String>,
}

impl FacultySearch {
    /// Spawns the worker on the current tokio runtime. Nothing is fetched
    /// until [`FacultySearch::start`] or a filter change.
    pub fn new<S: FacultySource>(source: S, subjects: Vec<Subject>, debounce: Duration) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let latest = Arc::new(AtomicU64::new(0));

        tokio::spawn(run_worker(source, request_rx, outcome_tx, latest.clone()));

        Self {
            filters: FacultyFilters::default(),
            subjects,
            pagination: Pagination::default(),
            debounce,
            generation: 0,
            latest,
            timer: None,
            requests: request_tx,
            outcomes: outcome_rx,
            rows: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// First query for the current subjects, sent without waiting.
    pub fn start(&mut self) {
        self.pagination.page = 0;
        self.dispatch_now();
    }

    pub fn set_university(&mut self, university: impl Into<String>) {
        self.filters.university = university.into();
        self.schedule();
    }

    pub fn set_faculty(&mut self, faculty: impl Into<String>) {
        self.filters.faculty = faculty.into();
        self.schedule();
    }

    pub fn set_year(&mut self, year: Option<u16>) {
        self.filters.year = year;
        self.schedule();
    }

    pub fn set_subjects(&mut self, subjects: Vec<Subject>) {
        self.subjects = subjects;
        self.schedule();
    }

    /// Returns false when already on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.pagination.has_next() {
            return false;
        }
        self.pagination.page += 1;
        self.dispatch_now();
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.pagination.has_prev() {
            return false;
        }
        self.pagination.page -= 1;
        self.dispatch_now();
        true
    }

    /// Drop the pending debounce timer and retire anything in flight.
    pub fn cancel(&mut self) {
        self.abort_timer();
        self.bump_generation();
        self.loading = false;
    }

    /// Apply every outcome that has arrived. Returns true if state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcomes.try_recv() {
            changed |= self.apply(outcome);
        }
        changed
    }

    /// Wait for the next outcome. `Some(true)` if it was applied, `Some(false)`
    /// if it was stale, `None` once the worker has gone away.
    pub async fn next_outcome(&mut self) -> Option<bool> {
        let outcome = self.outcomes.recv().await?;
        Some(self.apply(outcome))
    }

    pub fn filters(&self) -> &FacultyFilters {
        &self.filters
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn rows(&self) -> &[FacultyRow] {
        &self.rows
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.latest.store(self.generation, Ordering::SeqCst);
        self.generation
    }

    fn abort_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn current_request(&mut self) -> Request {
        let generation = self.bump_generation();
        Request {
            generation,
            params: build_query(&self.filters, &self.subjects, self.pagination.page),
        }
    }

    fn schedule(&mut self) {
        self.abort_timer();
        self.pagination.page = 0;
        // bounds of the old result set no longer apply
        self.pagination.total = 0;
        let request = self.current_request();
        let requests = self.requests.clone();
        let delay = self.debounce;

        tracing::debug!(generation = request.generation, ?delay, "faculty search debounced");
        self.loading = true;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = requests.send(request);
        }));
    }

    fn dispatch_now(&mut self) {
        self.abort_timer();
        let request = self.current_request();
        self.loading = true;
        if self.requests.send(request).is_err() {
            self.loading = false;
            self.error = Some("faculty search worker stopped".to_string());
        }
    }

    fn apply(&mut self, outcome: Outcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(
                generation = outcome.generation,
                current = self.generation,
                "discarding stale faculty search response"
            );
            return false;
        }

        self.loading = false;
        match outcome.result {
            Ok(page) => {
                self.rows = page.items;
                self.pagination.total = page.total;
                self.pagination.limit = page.limit;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!("faculty search failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
        true
    }
}

impl Drop for FacultySearch {
    fn drop(&mut self) {
        // The worker exits on its own once the request channel closes.
        self.abort_timer();
    }
}

async fn run_worker<S: FacultySource>(
    source: S,
    mut requests: mpsc::UnboundedReceiver<Request>,
    outcomes: mpsc::UnboundedSender<Outcome>,
    latest: Arc<AtomicU64>,
) {
    while let Some(mut request) = requests.recv().await {
        while let Ok(newer) = requests.try_recv() {
            request = newer;
        }
        if request.generation < latest.load(Ordering::SeqCst) {
            tracing::debug!(generation = request.generation, "skipping superseded faculty search");
            continue;
        }

        tracing::debug!(
            generation = request.generation,
            page = request.params.page,
            "dispatching faculty search"
        );
        let result = source.fetch(request.params).await;
        if outcomes
            .send(Outcome {
                generation: request.generation,
                result,
            })
            .is_err()
        {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use tokio::time::{sleep, Instant};

    const DEBOUNCE: Duration = Duration::from_millis(500);

    #[derive(Clone, Default)]
    struct FakeSource {
        calls: Arc<Mutex<Vec<(Instant, QueryParams)>>>,
    }

    impl FakeSource {
        fn calls(&self) -> Vec<QueryParams> {
            self.calls.lock().unwrap().iter().map(|(_, p)| p.clone()).collect()
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
        }
    }

    impl FacultySource for FakeSource {
        fn fetch(&self, params: QueryParams) -> BoxFuture<'static, Result<FacultyPage, ApiError>> {
            let calls = self.calls.clone();
            async move {
                calls.lock().unwrap().push((Instant::now(), params.clone()));
                match params.faculty.as_deref() {
                    Some("slow") => sleep(Duration::from_millis(1000)).await,
                    Some("boom") => {
                        return Err(ApiError::Status {
                            endpoint: "/faculties",
                            status: 503,
                        })
                    }
                    _ => {}
                }
                let name = params.faculty.clone().unwrap_or_default();
                Ok(FacultyPage {
                    items: vec![FacultyRow {
                        faculty_id: format!("p{}", params.page),
                        year: 2024,
                        faculty_name: name,
                        university_id: "U".to_string(),
                        university_name: "TSU".to_string(),
                        subjects: vec![],
                    }],
                    total: 25,
                    limit: 10,
                })
            }
            .boxed()
        }
    }

    fn session(source: &FakeSource) -> FacultySearch {
        FacultySearch::new(source.clone(), vec![Subject::History], DEBOUNCE)
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_changes_send_one_request() {
        let source = FakeSource::default();
        let mut search = session(&source);

        search.set_faculty("l");
        sleep(Duration::from_millis(100)).await;
        search.set_faculty("la");
        sleep(Duration::from_millis(100)).await;
        search.set_faculty("law");

        assert_eq!(search.next_outcome().await, Some(true));
        sleep(Duration::from_secs(2)).await;

        let calls = source.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].faculty.as_deref(), Some("law"));
        assert_eq!(calls[0].page, 1);
        assert_eq!(search.rows()[0].faculty_name, "law");
        assert!(!search.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_immediate() {
        let source = FakeSource::default();
        let mut search = session(&source);
        let t0 = Instant::now();

        search.start();
        assert_eq!(search.next_outcome().await, Some(true));

        assert!(source.call_times()[0] - t0 < DEBOUNCE);
        assert_eq!(source.calls()[0].subjects, "HISTORY");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_discarded() {
        let source = FakeSource::default();
        let mut search = session(&source);

        search.set_faculty("slow");
        // timer fires, slow request goes out
        sleep(Duration::from_millis(600)).await;
        search.set_faculty("fast");

        // the slow response lands first and is retired
        assert_eq!(search.next_outcome().await, Some(false));
        assert!(search.rows().is_empty());
        assert!(search.is_loading());

        assert_eq!(search.next_outcome().await, Some(true));
        assert_eq!(search.rows()[0].faculty_name, "fast");
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pagination_not_debounced() {
        let source = FakeSource::default();
        let mut search = session(&source);
        search.start();
        search.next_outcome().await;

        assert!(!search.previous_page());
        let t0 = Instant::now();
        assert!(search.next_page());
        assert_eq!(search.next_outcome().await, Some(true));

        assert!(source.call_times()[1] - t0 < DEBOUNCE);
        assert_eq!(source.calls()[1].page, 2);
        assert_eq!(search.pagination().page, 1);
        assert_eq!(search.rows()[0].faculty_id, "p2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_page_has_no_next() {
        let source = FakeSource::default();
        let mut search = session(&source);
        search.start();
        search.next_outcome().await;

        assert!(search.next_page());
        search.next_outcome().await;
        assert!(search.next_page());
        search.next_outcome().await;
        // 25 rows, 10 per page
        assert!(!search.next_page());
        assert_eq!(source.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_change_resets_page() {
        let source = FakeSource::default();
        let mut search = session(&source);
        search.start();
        search.next_outcome().await;
        search.next_page();
        search.next_outcome().await;

        search.set_subjects(vec![Subject::Biology, Subject::Chemistry]);
        assert_eq!(search.pagination().page, 0);
        search.next_outcome().await;

        let last = source.calls().pop().unwrap();
        assert_eq!(last.page, 1);
        assert_eq!(last.subjects, "BIOLOGY,CHEMISTRY");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_paging_until_new_filters_answer() {
        let source = FakeSource::default();
        let mut search = session(&source);
        search.start();
        search.next_outcome().await;
        assert!(search.pagination().has_next());

        search.set_faculty("law");
        assert!(!search.next_page());

        assert_eq!(search.next_outcome().await, Some(true));
        assert!(search.next_page());
        search.next_outcome().await;

        let calls = source.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2].page, 2);
        assert_eq!(calls[2].faculty.as_deref(), Some("law"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_change_waits_for_in_flight_request() {
        let source = FakeSource::default();
        let mut search = session(&source);
        search.set_faculty("slow");
        assert_eq!(search.next_outcome().await, Some(true));

        // page 2 goes out and stays in flight for a second
        assert!(search.next_page());
        sleep(Duration::from_millis(100)).await;
        assert_eq!(source.calls().len(), 2);

        assert!(search.previous_page());
        sleep(Duration::from_millis(100)).await;
        assert_eq!(source.calls().len(), 2);

        // page 2 lands first and is retired, then page 1 is applied
        assert_eq!(search.next_outcome().await, Some(false));
        assert_eq!(search.next_outcome().await, Some(true));

        let calls = source.calls();
        let times = source.call_times();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].page, 2);
        assert_eq!(calls[2].page, 1);
        assert!(times[2] - times[1] >= Duration::from_millis(1000));
        assert_eq!(search.pagination().page, 0);
        assert_eq!(search.rows()[0].faculty_id, "p1");
        assert!(!search.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_timer() {
        let source = FakeSource::default();
        let mut search = session(&source);

        search.set_university("Ilia");
        search.cancel();
        sleep(Duration::from_secs(2)).await;

        assert!(source.calls().is_empty());
        assert!(!search.poll());
        assert!(!search.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_previous_rows() {
        let source = FakeSource::default();
        let mut search = session(&source);
        search.start();
        search.next_outcome().await;

        search.set_faculty("boom");
        assert_eq!(search.next_outcome().await, Some(true));

        assert_eq!(search.rows().len(), 1);
        assert!(search.error().unwrap().contains("503"));
    }
}
