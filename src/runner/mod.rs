pub mod controller;
pub mod driver;
pub mod easing;
pub mod logs;
pub mod metrics;

pub use controller::*;
pub use driver::*;
pub use easing::*;
pub use logs::*;
pub use metrics::*;
