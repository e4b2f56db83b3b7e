use std::time::Duration;

use log::{debug, error, info, warn};

use crate::clients::{
    entities::{Setlist, SetlistPage},
    errors::Result,
};

pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);

/// A paginated source of attended setlists. Pages are 1-based.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_page(&self, username: &str, page: u64) -> Result<SetlistPage>;
}

/// Walks every page of a user's attended concerts, one request at a time.
pub struct Fetcher<S> {
    source: S,
    delay: Duration,
}

impl<S: PageSource> Fetcher<S> {
    pub fn new(source: S, delay: Duration) -> Self {
        Fetcher { source, delay }
    }

    /// Collects setlists in page order.
    ///
    /// A failed page is logged and ends the walk; whatever was gathered up to
    /// that point is returned.
    pub async fn fetch_all(&self, username: &str) -> Vec<Setlist> {
        let mut setlists = Vec::new();
        let mut page: u64 = 1;

        loop {
            let data = match self.source.fetch_page(username, page).await {
                Ok(data) => data,
                Err(e) => {
                    error!("Error fetching page {page} for {username}: {e}");
                    break;
                }
            };

            let received = data.setlist.len();
            setlists.extend(data.setlist);
            debug!(
                "Page {page}: {received} setlists, {} of {} collected",
                setlists.len(),
                data.total
            );

            if page.saturating_mul(data.items_per_page) >= data.total {
                break;
            }
            // A zero page size or an empty page would otherwise never reach `total`
            if data.items_per_page == 0 || received == 0 {
                warn!(
                    "Page {page} reported {} items per page with {received} setlists, stopping at {} of {}",
                    data.items_per_page,
                    setlists.len(),
                    data.total
                );
                break;
            }
            page += 1;

            tokio::time::sleep(self.delay).await;
        }

        info!("Fetched {} setlists for {username}", setlists.len());
        setlists
    }

    #[cfg(test)]
    fn into_source(self) -> S {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::clients::entities::Artist;
    use crate::clients::errors::Error;

    /// Serves `total` setlists in pages of `per_page`, optionally failing one page.
    struct FakeSource {
        total: u64,
        per_page: u64,
        fail_on: Option<u64>,
        requested: RefCell<Vec<u64>>,
    }

    impl FakeSource {
        fn new(total: u64, per_page: u64) -> Self {
            FakeSource {
                total,
                per_page,
                fail_on: None,
                requested: RefCell::new(Vec::new()),
            }
        }

        fn failing_on(mut self, page: u64) -> Self {
            self.fail_on = Some(page);
            self
        }
    }

    fn numbered(n: u64) -> Setlist {
        Setlist {
            artist: Some(Artist {
                name: Some(format!("Artist {n}")),
            }),
            ..Default::default()
        }
    }

    fn artist_of(setlist: &Setlist) -> &str {
        setlist
            .artist
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .unwrap()
    }

    impl PageSource for FakeSource {
        async fn fetch_page(&self, _username: &str, page: u64) -> Result<SetlistPage> {
            self.requested.borrow_mut().push(page);
            if self.fail_on == Some(page) {
                return Err(Error::UnexpectedResponse {
                    status: 500,
                    body: "boom".into(),
                });
            }
            let start = (page - 1) * self.per_page;
            let end = (start + self.per_page).min(self.total);
            Ok(SetlistPage {
                setlist: (start..end).map(numbered).collect(),
                total: self.total,
                items_per_page: self.per_page,
                page,
            })
        }
    }

    fn fetcher(source: FakeSource) -> Fetcher<FakeSource> {
        Fetcher::new(source, Duration::ZERO)
    }

    #[tokio::test]
    async fn collects_all_pages_in_order() {
        let fetcher = fetcher(FakeSource::new(45, 20));
        let setlists = fetcher.fetch_all("fan").await;

        assert_eq!(setlists.len(), 45);
        assert_eq!(artist_of(&setlists[0]), "Artist 0");
        assert_eq!(artist_of(&setlists[44]), "Artist 44");
        assert_eq!(*fetcher.into_source().requested.borrow(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn stops_exactly_at_total_boundary() {
        let fetcher = fetcher(FakeSource::new(40, 20));
        let setlists = fetcher.fetch_all("fan").await;

        assert_eq!(setlists.len(), 40);
        assert_eq!(*fetcher.into_source().requested.borrow(), vec![1, 2]);
    }

    #[tokio::test]
    async fn empty_history_requests_single_page() {
        let fetcher = fetcher(FakeSource::new(0, 20));
        let setlists = fetcher.fetch_all("fan").await;

        assert!(setlists.is_empty());
        assert_eq!(*fetcher.into_source().requested.borrow(), vec![1]);
    }

    #[tokio::test]
    async fn error_keeps_earlier_pages() {
        let fetcher = fetcher(FakeSource::new(100, 20).failing_on(3));
        let setlists = fetcher.fetch_all("fan").await;

        assert_eq!(setlists.len(), 40);
        assert_eq!(artist_of(&setlists[39]), "Artist 39");
        assert_eq!(*fetcher.into_source().requested.borrow(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn error_on_first_page_yields_nothing() {
        let fetcher = fetcher(FakeSource::new(10, 5).failing_on(1));
        assert!(fetcher.fetch_all("fan").await.is_empty());
    }

    #[tokio::test]
    async fn zero_page_size_does_not_loop() {
        let fetcher = fetcher(FakeSource::new(10, 0));
        let setlists = fetcher.fetch_all("fan").await;

        assert!(setlists.is_empty());
        assert_eq!(*fetcher.into_source().requested.borrow(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_requests() {
        let fetcher = Fetcher::new(FakeSource::new(3, 1), Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        fetcher.fetch_all("fan").await;

        // two gaps between three requests, none after the last one
        assert_eq!(started.elapsed(), Duration::from_secs(4));
    }
}
