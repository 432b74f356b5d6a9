//! Paging through views larger than one response.
//!
//! A [`ViewPager`] asks its page provider for `page_size + 1` rows. The extra
//! row is not returned; it becomes the cursor the next request starts at, so
//! pages never overlap and no `skip` is needed.

use std::fmt::Debug;
use std::future::Future;
use std::marker::PhantomData;

use couch_core::view::describe;
use couch_core::{AllDocsResponse, PageCursor, ReducedViewQueryResponse, ViewPage, ViewQueryResponse};
use futures::Stream;
use futures::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{CouchDbClient, error::ClientError, query::ViewQuery};

/// Future returned by the page providers of the client's pager helpers.
pub type PageFuture<'a, R> = BoxFuture<'a, Result<R, ClientError>>;

pub struct ViewPager<K, R, F> {
    page_size: usize,
    provider: F,
    next: Option<PageCursor<K>>,
    fetched: bool,
    _page: PhantomData<fn() -> R>,
}

impl<K, R, F> ViewPager<K, R, F> {
    /// Page with `page_size` rows per page, fetched through `provider`.
    ///
    /// The provider receives the cursor to resume from (`None` for the
    /// first page) and the number of rows to request.
    pub const fn new(page_size: usize, provider: F) -> Self {
        Self {
            page_size,
            provider,
            next: None,
            fetched: false,
            _page: PhantomData,
        }
    }

    /// True before the first fetch, afterwards only while a cursor is known.
    pub const fn has_next(&self) -> bool {
        !self.fetched || self.next.is_some()
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }
}

impl<K, R, F, Fut> ViewPager<K, R, F>
where
    K: Clone + PartialEq + Debug,
    R: ViewPage<Key = K>,
    F: FnMut(Option<PageCursor<K>>, usize) -> Fut,
    Fut: Future<Output = Result<R, ClientError>>,
{
    /// Fetch the next page, `Ok(None)` once the view is exhausted.
    ///
    /// # Errors
    ///
    /// Propagates the provider's error. The pager stays where it was, so
    /// the same page can be requested again.
    pub async fn next_page(&mut self) -> Result<Option<R>, ClientError> {
        if !self.has_next() {
            return Ok(None);
        }

        let mut page = (self.provider)(self.next.clone(), self.page_size + 1).await?;
        let rows = page.row_count();
        let cursor = describe(self.next.as_ref());
        match page.totals() {
            Some((total_rows, offset)) => {
                tracing::info!(?total_rows, ?offset, rows, next_page = %cursor, "got view page");
            }
            None => tracing::info!(rows, next_page = %cursor, "got view page"),
        }

        let next = if rows <= self.page_size {
            None
        } else {
            page.take_trailing()
        };
        self.update_next_page(next, page.totals());
        self.fetched = true;
        Ok(Some(page))
    }

    fn update_next_page(&mut self, next: Option<PageCursor<K>>, totals: Option<(Option<u64>, Option<u64>)>) {
        if next.is_some() && next == self.next {
            let offset = totals.and_then(|(_, offset)| offset);
            tracing::info!(
                previous = %describe(self.next.as_ref()),
                next = %describe(next.as_ref()),
                ?offset,
                "next page hasn't changed, stopping"
            );
            self.next = None;
            return;
        }
        self.next = next;
    }

    /// All remaining pages as a stream. The stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<R, ClientError>> {
        futures::stream::try_unfold(self, |mut pager| async move {
            let page = pager.next_page().await?;
            Ok::<_, ClientError>(page.map(|page| (page, pager)))
        })
    }
}

fn check_pager_args(page_size: usize, base: &ViewQuery) -> Result<(), ClientError> {
    if page_size == 0 {
        return Err(ClientError::InvalidArgument(
            "page size must be at least 1".into(),
        ));
    }
    // CouchDB refuses `keys` together with `startkey`, which every page after
    // the first needs.
    if base.keys.is_some() {
        return Err(ClientError::InvalidArgument(
            "cannot page a query with `keys`; use start and end keys instead".into(),
        ));
    }
    Ok(())
}

impl CouchDbClient {
    /// Page through a (non-reduced) view. `base` supplies everything but the
    /// start position and the limit.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for a zero `page_size` or a
    /// `base` query with `keys`.
    #[allow(clippy::type_complexity)]
    pub fn view_pager<'a, K, V, D>(
        &'a self,
        design: &'a str,
        view: &'a str,
        page_size: usize,
        base: ViewQuery,
    ) -> Result<
        ViewPager<
            K,
            ViewQueryResponse<K, V, D>,
            impl FnMut(Option<PageCursor<K>>, usize) -> PageFuture<'a, ViewQueryResponse<K, V, D>> + 'a,
        >,
        ClientError,
    >
    where
        K: Serialize + DeserializeOwned + Send + 'a,
        V: DeserializeOwned + Send + 'a,
        D: DeserializeOwned + Send + 'a,
    {
        check_pager_args(page_size, &base)?;
        let provider = move |cursor: Option<PageCursor<K>>, limit: usize| -> PageFuture<'a, ViewQueryResponse<K, V, D>> {
            let query = base.clone().resume_from(cursor.as_ref(), limit);
            Box::pin(async move {
                let query = query?;
                self.query_view(design, view, &query).await
            })
        };
        Ok(ViewPager::new(page_size, provider))
    }

    /// Page through the grouped rows of a reduced view.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for a zero `page_size` or a
    /// `base` query with `keys`.
    #[allow(clippy::type_complexity)]
    pub fn reduced_view_pager<'a, K, V>(
        &'a self,
        design: &'a str,
        view: &'a str,
        page_size: usize,
        base: ViewQuery,
    ) -> Result<
        ViewPager<
            K,
            ReducedViewQueryResponse<K, V>,
            impl FnMut(Option<PageCursor<K>>, usize) -> PageFuture<'a, ReducedViewQueryResponse<K, V>> + 'a,
        >,
        ClientError,
    >
    where
        K: Serialize + DeserializeOwned + Send + 'a,
        V: DeserializeOwned + Send + 'a,
    {
        check_pager_args(page_size, &base)?;
        let provider = move |cursor: Option<PageCursor<K>>, limit: usize| -> PageFuture<'a, ReducedViewQueryResponse<K, V>> {
            let query = base.clone().resume_from(cursor.as_ref(), limit);
            Box::pin(async move {
                let query = query?;
                self.query_reduced_view(design, view, &query).await
            })
        };
        Ok(ViewPager::new(page_size, provider))
    }

    /// Page through `_all_docs`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for a zero `page_size` or a
    /// `base` query with `keys`.
    #[allow(clippy::type_complexity)]
    pub fn all_docs_pager<'a, D>(
        &'a self,
        page_size: usize,
        base: ViewQuery,
    ) -> Result<
        ViewPager<
            String,
            AllDocsResponse<D>,
            impl FnMut(Option<PageCursor<String>>, usize) -> PageFuture<'a, AllDocsResponse<D>> + 'a,
        >,
        ClientError,
    >
    where
        D: DeserializeOwned + Send + 'a,
    {
        check_pager_args(page_size, &base)?;
        let provider = move |cursor: Option<PageCursor<String>>, limit: usize| -> PageFuture<'a, AllDocsResponse<D>> {
            let query = base.clone().resume_from(cursor.as_ref(), limit);
            Box::pin(async move {
                let query = query?;
                self.all_docs(&query).await
            })
        };
        Ok(ViewPager::new(page_size, provider))
    }
}
