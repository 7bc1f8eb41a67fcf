mod health;
mod setups;

pub use health::health_router;
pub use setups::setups_router;
