pub mod app_state;
pub mod dataset;
pub mod export;
pub mod query;
pub mod remote;
pub mod server;
pub mod settings;
pub mod store;

pub use app_state::AppState;
pub use settings::Settings;
