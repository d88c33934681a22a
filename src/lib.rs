pub mod app;
pub mod auth;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod duration;
pub mod errors;
pub mod goals;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod todos;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use clock::{SessionClock, TimeSource, local_time};
pub use config::Config;
pub use state::AppState;
pub use storage::KvStore;
pub use tracker::Tracker;
