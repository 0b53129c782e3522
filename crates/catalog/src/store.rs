//! In-memory catalog with refresh and failure policy

use crate::models::{parse_catalog, Titles};
use crate::source::CatalogSource;
use arcade_errors::{CatalogError, Error};
use arcade_events::{AppEvent, CatalogEvent, EventEmitter, EventSender, FailureContext};
use arcade_types::{TitleDescriptor, TitleKey};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// What a failed refresh does to the titles already held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Keep serving the previous snapshot
    #[default]
    RetainLastKnown,
    /// Drop the catalog until the next successful refresh
    Clear,
}

impl FailurePolicy {
    #[must_use]
    pub fn from_retain(retain: bool) -> Self {
        if retain {
            Self::RetainLastKnown
        } else {
            Self::Clear
        }
    }
}

/// Latest catalog snapshot, replaced wholesale on every refresh
pub struct CatalogStore {
    source: Arc<dyn CatalogSource>,
    titles: RwLock<Option<Arc<Titles>>>,
    policy: FailurePolicy,
    tx: Option<EventSender>,
}

impl EventEmitter for CatalogStore {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }
}

impl CatalogStore {
    pub fn new(source: Arc<dyn CatalogSource>, policy: FailurePolicy) -> Self {
        Self {
            source,
            titles: RwLock::new(None),
            policy,
            tx: None,
        }
    }

    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Fetch and parse the catalog, replacing the current snapshot
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` on any fetch or parse failure, after
    /// the failure policy has been applied.
    pub async fn refresh(&self) -> Result<Arc<Titles>, Error> {
        let fetched = match self.source.fetch().await {
            Ok(body) => parse_catalog(&body),
            Err(e) => Err(e),
        };

        match fetched {
            Ok(titles) => {
                let titles = Arc::new(titles);
                *self.titles.write().unwrap_or_else(PoisonError::into_inner) =
                    Some(Arc::clone(&titles));
                tracing::debug!(count = titles.len(), "catalog refreshed");
                self.emit(AppEvent::Catalog(CatalogEvent::Updated {
                    title_count: titles.len(),
                }));
                Ok(titles)
            }
            Err(e) => {
                let retained = {
                    let mut guard = self.titles.write().unwrap_or_else(PoisonError::into_inner);
                    if self.policy == FailurePolicy::Clear {
                        *guard = None;
                    }
                    guard.is_some()
                };
                tracing::warn!(error = %e, retained, "catalog refresh failed");
                self.emit(AppEvent::Catalog(CatalogEvent::Unavailable {
                    failure: FailureContext::from_error(&e),
                    retained,
                }));
                Err(CatalogError::Unavailable {
                    message: e.to_string(),
                }
                .into())
            }
        }
    }

    /// Current ordered titles, `None` while the catalog is unavailable
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<Titles>> {
        self.titles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Look a title up by id
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::TitleNotFound` if no current title has this id.
    pub fn get(&self, id: &str) -> Result<Arc<TitleDescriptor>, Error> {
        self.snapshot()
            .and_then(|titles| titles.iter().find(|t| t.id.as_str() == id).cloned())
            .ok_or_else(|| CatalogError::TitleNotFound { id: id.to_string() }.into())
    }

    /// Look a title up by its position in the catalog
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::IndexOutOfRange` if the position is past the end.
    pub fn get_by_index(&self, index: usize) -> Result<Arc<TitleDescriptor>, Error> {
        self.snapshot()
            .and_then(|titles| titles.get(index).cloned())
            .ok_or_else(|| CatalogError::IndexOutOfRange { index }.into())
    }

    /// Resolve either form of title address
    ///
    /// # Errors
    ///
    /// Returns the lookup error for the key's form.
    pub fn resolve(&self, key: &TitleKey) -> Result<Arc<TitleDescriptor>, Error> {
        match key {
            TitleKey::Id(id) => self.get(id),
            TitleKey::Index(index) => self.get_by_index(*index),
        }
    }

    /// Refresh on a fixed interval until `shutdown` fires
    ///
    /// The first refresh happens immediately. Failures are logged and never
    /// end the loop.
    pub fn spawn_refresh_loop(
        self: Arc<Self>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    () = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(err) = self.refresh().await {
                            tracing::debug!(error = %err, "scheduled catalog refresh failed");
                        }
                    }
                }
            }
            tracing::debug!("catalog refresh loop stopped");
        })
    }
}
