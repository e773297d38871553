pub mod snapshot;
pub mod tracker;
