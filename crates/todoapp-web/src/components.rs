mod task_counters;
mod task_row;

pub use task_counters::TaskCounters;
pub use task_row::TaskRow;
