pub mod advice;
pub mod app;
pub mod backup;
pub mod config;
pub mod date_key;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod records;
pub mod state;
pub mod storage;
pub mod streak;

pub use app::router;
pub use config::Config;
pub use date_key::DateKey;
pub use records::RecordStore;
pub use state::AppState;
pub use storage::{FileSlot, MemorySlot, RecordSlot};
