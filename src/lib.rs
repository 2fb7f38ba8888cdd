pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod translate;

pub use config::Config;
pub use routes::create_app;
pub use state::AppState;
