pub mod collector;
pub mod estimator;
pub mod kill;
pub mod platform;
pub mod process;
pub mod snapshot;
pub mod stat;
