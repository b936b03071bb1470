//! Output formatting for CLI results.

pub mod detail;
pub mod table;

pub use detail::{format_params_detail, signed_to_f64};
pub use table::{format_curve_table, format_simulation_table};
