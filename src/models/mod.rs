pub mod record;
pub mod stats;

pub use record::{SleepRecord, PERIOD_DAYS};
pub use stats::{StatField, StatRecord};
