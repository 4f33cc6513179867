use skywave_core::identity::AccountService;
use skywave_store::InMemoryStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InMemoryStore>,
    pub accounts: Arc<AccountService>,
}

impl AppState {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        let accounts = Arc::new(AccountService::new(store.clone()));
        Self { store, accounts }
    }
}
