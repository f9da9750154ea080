use crate::core::currency::Currency;
use anyhow::Result;
use std::future::Future;
use tokio::sync::Mutex;
use tracing::debug;

/// Holds the provider's currency list once it has been fetched.
///
/// The lock is held while the first fetch runs, so concurrent callers wait for
/// it instead of issuing their own request. Failed fetches leave the cache
/// empty.
#[derive(Default)]
pub struct CurrencyListCache {
    inner: Mutex<Option<Vec<Currency>>>,
}

impl CurrencyListCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Vec<Currency>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Currency>>>,
    {
        let mut slot = self.inner.lock().await;
        if let Some(currencies) = slot.as_ref() {
            debug!("Cache HIT");
            return Ok(currencies.clone());
        }

        debug!("Cache MISS");
        let currencies = fetch().await?;
        *slot = Some(currencies.clone());
        Ok(currencies)
    }

    pub async fn is_populated(&self) -> bool {
        self.inner.lock().await.is_some()
    }

    /// Drops the cached list; the next lookup fetches again.
    pub async fn reset(&self) {
        debug!("Cache RESET");
        *self.inner.lock().await = None;
    }
}
