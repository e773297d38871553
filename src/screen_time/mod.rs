//! Screen-time aggregation.
//!  The basic idea is:
//!   - The API hands out raw days which may repeat dates and categories.
//!   - [merge::merge_by_date] folds them into a sorted [entities::Dataset].
//!   - Views narrow the dataset with [range] and reduce it with [stats].

pub mod entities;
pub mod entry_form;
pub mod limit;
pub mod merge;
pub mod range;
pub mod stats;
