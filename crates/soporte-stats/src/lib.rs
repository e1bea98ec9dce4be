//! # soporte-stats
//!
//! Statistics aggregation for the support tracker: pure groupby/reduce
//! functions over already-fetched record slices. Rendering belongs to the
//! frontend; this crate only computes the numbers behind the charts.
//!
//! ## Module Overview
//!
//! - [`periods`] - `Period` windows and `filter_by_period`
//! - [`counts`] - per-subject/department/technician/month counts and the
//!   dashboard "top" lookups

#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]

pub mod counts;
pub mod periods;

// Re-export key functions at the crate root.
pub use counts::{
    counts_by_department, counts_by_subject, counts_by_technician, monthly_counts,
    top_department, top_technician,
};
pub use periods::{filter_by_period, Period};
