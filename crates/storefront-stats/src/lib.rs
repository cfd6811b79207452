//! Dashboard aggregation helpers
//!
//! Pure building blocks used by the admin dashboard: calendar-month chart
//! buckets, per-category inventory ratios, month-over-month percentage
//! change, and a few user/revenue reductions. Nothing in this crate performs
//! I/O on its own; the inventory ratio calculator is handed a counting
//! function by the caller.

pub mod chart;
pub mod demographics;
pub mod inventory;
pub mod percentage;
pub mod revenue;
pub mod timeframe;

pub use chart::{count_by_month, month_slot, sum_by_month, Window};
pub use demographics::{age_on, AgeGroups};
pub use inventory::{inventory_ratios, ratio_percent, CategoryRatios};
pub use percentage::calc_percentage;
pub use revenue::RevenueDistribution;
pub use timeframe::DateRange;
