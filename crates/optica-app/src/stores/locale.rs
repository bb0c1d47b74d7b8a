//! # Locale Store
//!
//! The active storefront language, persisted across restarts.
//!
//! Initialization policy at first launch: the persisted value if present,
//! otherwise the device-reported locale when it maps to a supported code,
//! otherwise the baseline language (English). Text direction is always
//! derived from the active language, never stored.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use optica_core::{Language, TextDirection};
use optica_store::{Hydration, PersistedStore, Result, StorageBackend};

/// Storage key for the persisted language.
pub const LOCALE_STORE: &str = "optica.locale";

/// The locale/language store.
#[derive(Clone)]
pub struct LocaleStore {
    inner: PersistedStore<Language>,
}

impl LocaleStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Result<Self> {
        Ok(LocaleStore {
            inner: PersistedStore::new(LOCALE_STORE, backend)?,
        })
    }

    /// First-launch initialization: persisted value, else device locale,
    /// else baseline. Returns the active language.
    pub async fn init(&self, device_locale: Option<&str>) -> Language {
        match self.inner.hydrate().await {
            Hydration::Restored => self.language(),
            Hydration::Defaulted => {
                let language = device_locale
                    .and_then(Language::from_device_locale)
                    .unwrap_or_default();
                debug!(language = %language.code(), "Locale initialized from device");
                self.inner.mutate(|l| *l = language);
                language
            }
        }
    }

    /// Sets the active language and persists it.
    pub fn set_language(&self, language: Language) {
        debug!(language = %language.code(), "Language changed");
        self.inner.mutate(|l| *l = language);
    }

    /// The active language.
    pub fn language(&self) -> Language {
        self.inner.get()
    }

    /// Reading direction derived from the active language.
    pub fn direction(&self) -> TextDirection {
        self.language().direction()
    }

    /// Whether the active language renders right-to-left.
    pub fn is_rtl(&self) -> bool {
        self.language().is_rtl()
    }

    /// Language snapshots for reactive shell rendering.
    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.inner.subscribe()
    }

    /// Awaitable flush for lifecycle points.
    pub async fn flush_now(&self) -> Result<()> {
        self.inner.flush_now().await
    }
}
