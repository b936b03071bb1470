//! Command implementations.

pub mod curve;
pub mod params;
pub mod simulate;

pub use curve::run_curve;
pub use params::run_params;
pub use simulate::run_simulate;
