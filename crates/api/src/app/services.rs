//! Backend selection and service construction.

use std::sync::Arc;

use boardrent_catalog::Game;
use boardrent_core::GameId;
use boardrent_infra::{AppStore, InMemoryRentalStore, PostgresRentalStore};
use boardrent_rentals::RentalService;
use sqlx::PgPool;

/// Everything the route handlers reach for: the rental core and the
/// storage backend behind it.
pub struct AppServices {
    store: Arc<dyn AppStore>,
    rentals: RentalService,
}

impl AppServices {
    /// Wire the rental service and registry access to one storage backend.
    pub fn from_store<S: AppStore + 'static>(store: Arc<S>) -> Self {
        let rentals = RentalService::new(store.clone());
        Self { store, rentals }
    }

    pub fn rentals(&self) -> &RentalService {
        &self.rentals
    }

    pub fn store(&self) -> &dyn AppStore {
        &*self.store
    }
}

/// Build services from the environment.
///
/// `USE_PERSISTENT_STORES=true` selects Postgres (requires `DATABASE_URL`,
/// schema in `crates/infra/migrations/`); anything else runs on the
/// in-memory backend with a small demo catalog, since the catalog has no
/// write endpoint.
pub async fn build_services() -> AppServices {
    let use_persistent = std::env::var("USE_PERSISTENT_STORES")
        .map(|v| v == "true")
        .unwrap_or(false);

    if use_persistent {
        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set when USE_PERSISTENT_STORES=true");
        let pool = PgPool::connect(&database_url)
            .await
            .expect("failed to connect to Postgres");

        tracing::info!("persistence: postgres");
        AppServices::from_store(Arc::new(PostgresRentalStore::new(pool)))
    } else {
        tracing::info!("persistence: in-memory (dev mode, demo catalog seeded)");
        let store = Arc::new(InMemoryRentalStore::new());
        seed_demo_catalog(&store);
        AppServices::from_store(store)
    }
}

fn seed_demo_catalog(store: &InMemoryRentalStore) {
    let games = [
        ("Banco Imobiliário", "http://img.example/banco.png", 3, 1500),
        ("Detetive", "http://img.example/detetive.png", 2, 2500),
        ("War", "http://img.example/war.png", 4, 2000),
    ];
    for (name, image, stock, price) in games {
        let game = Game::new(GameId::new(), name, image, stock, price)
            .expect("demo catalog entries are valid");
        store.put_game(game);
    }
}
