pub mod actions;
pub mod app;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod ist;
pub mod models;
pub mod notices;
pub mod page;
pub mod ports;
pub mod render;
pub mod session;
pub mod state;
pub mod transport;

#[cfg(test)]
mod testing;

pub use actions::ActionStatus;
pub use app::router;
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use state::AppState;
