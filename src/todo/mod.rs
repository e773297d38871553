//! Todo list. [ordering::sort_tasks] is the single place deciding the order tasks are shown in.

pub mod board;
pub mod entities;
pub mod ordering;
