//! Screen rendering and input handling.

mod dashboard;
mod login;
mod trip;

pub use dashboard::DashboardScreen;
pub use login::{LoginScreen, credentials_valid};
pub use trip::TripScreen;
