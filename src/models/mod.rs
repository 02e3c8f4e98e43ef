pub mod catalog;
pub mod config;
pub mod dataset;
pub mod metrics;
pub mod raw;
pub mod reports;
pub mod state;

pub use catalog::*;
pub use config::*;
pub use dataset::*;
pub use metrics::*;
pub use raw::*;
pub use reports::*;
pub use state::*;
