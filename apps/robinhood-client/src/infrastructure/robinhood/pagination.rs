//! Paginated list fetching.
//!
//! List endpoints return `{results, next, previous}`. `fetch_all` requests
//! the first page and, when given a page budget, follows `next` links up to
//! that many more times. Any failed page fails the whole call.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::api_types::Page;
use super::error::RobinhoodError;
use super::http_client::RobinhoodHttpClient;

/// Anything that can fetch one decoded page.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch and decode the page at `url`.
    async fn fetch_page<T>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Page<T>, RobinhoodError>
    where
        T: DeserializeOwned + Send;
}

#[async_trait]
impl PageSource for RobinhoodHttpClient {
    async fn fetch_page<T>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Page<T>, RobinhoodError>
    where
        T: DeserializeOwned + Send,
    {
        self.get(url, query).await
    }
}

/// Drain a list endpoint.
///
/// With no budget only the first page is returned, even when `next` is set.
/// With budget `n` at most `n + 1` pages are fetched; a budget of zero
/// fetches exactly one. `next` links are requested unmodified and without
/// the initial query. Items keep server order.
pub async fn fetch_all<S, T>(
    source: &S,
    url: &str,
    query: &[(&str, &str)],
    page_budget: Option<u32>,
) -> Result<Vec<T>, RobinhoodError>
where
    S: PageSource,
    T: DeserializeOwned + Send,
{
    let first: Page<T> = source.fetch_page(url, query).await?;
    let mut items = first.results;

    let Some(budget) = page_budget else {
        return Ok(items);
    };

    let mut next = first.next;
    let mut followed = 0;
    while followed < budget {
        let Some(link) = next.take().filter(|link| !link.is_empty()) else {
            break;
        };
        let page: Page<T> = source.fetch_page(&link, &[]).await?;
        items.extend(page.results);
        next = page.next;
        followed += 1;
    }

    tracing::debug!(
        url,
        pages = followed + 1,
        items = items.len(),
        "Fetched paginated list"
    );
    Ok(items)
}
