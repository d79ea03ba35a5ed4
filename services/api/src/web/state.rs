//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::web::pages::PageRenderer;
use paper_shelf_core::ports::{DatabaseService, PaperSourceService, PasswordHasherService};
use paper_shelf_core::{Accounts, ReadingList};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub paper_source: Arc<dyn PaperSourceService>,
    pub hasher: Arc<dyn PasswordHasherService>,
    pub config: Arc<Config>,
    pub pages: Arc<PageRenderer>,
}

impl AppState {
    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(self.db.as_ref(), self.hasher.as_ref())
    }

    pub fn reading_list(&self) -> ReadingList<'_> {
        ReadingList::new(self.db.as_ref())
    }
}
