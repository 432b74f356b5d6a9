use std::fmt::Debug;
use std::future::Future;

use couch_client::{ClientError, ViewPager};
use couch_core::{PageCursor, ViewPage};

/// Drain `pager`, flattening each page into rows, up to `limit` rows.
pub async fn collect_rows<K, R, F, Fut, T>(
    mut pager: ViewPager<K, R, F>,
    limit: Option<usize>,
    rows_of: impl Fn(R) -> Vec<T>,
) -> anyhow::Result<Vec<T>>
where
    K: Clone + PartialEq + Debug,
    R: ViewPage<Key = K>,
    F: FnMut(Option<PageCursor<K>>, usize) -> Fut,
    Fut: Future<Output = Result<R, ClientError>>,
{
    let mut rows = Vec::new();
    let mut pages = 0usize;
    while let Some(page) = pager.next_page().await? {
        pages += 1;
        rows.extend(rows_of(page));
        if limit.is_some_and(|limit| rows.len() >= limit) {
            break;
        }
    }
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    tracing::debug!(pages, rows = rows.len(), "collected view pages");
    Ok(rows)
}
