pub mod memory;
pub mod store;
pub mod supabase;
pub mod supabase_store;

use std::sync::Arc;

use tracing::info;

use shared_config::AppConfig;

pub use memory::InMemoryStore;
pub use store::{ClaimOutcome, ClinicStore, StoreError};
pub use supabase_store::SupabaseStore;

/// Picks the PostgREST store when Supabase is configured, the in-memory store otherwise.
pub fn connect_store(config: &AppConfig) -> Arc<dyn ClinicStore> {
    if config.is_configured() {
        info!("Using Supabase slot store at {}", config.supabase_url);
        Arc::new(SupabaseStore::new(config))
    } else {
        info!("Using in-memory slot store");
        Arc::new(InMemoryStore::new())
    }
}
