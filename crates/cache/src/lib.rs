pub mod refresher;
pub mod store;

pub use refresher::Refresher;
pub use store::{CachedSetup, RefreshOutcome, SetupCache};
