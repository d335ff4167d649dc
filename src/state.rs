use crate::advice::AdviceDesk;
use crate::records::RecordStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<RecordStore>>,
    pub coach: Arc<AdviceDesk>,
}

impl AppState {
    pub fn new(store: RecordStore, coach: AdviceDesk) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            coach: Arc::new(coach),
        }
    }
}
