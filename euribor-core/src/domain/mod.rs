//! Domain types for the Euribor pipeline

pub mod period;
pub mod rate;
pub mod work_item;

pub use period::{PeriodError, YearMonth};
pub use rate::{DailyRate, MonthRates, MonthlyAverage, Rate, RateParseError};
pub use work_item::WorkItem;
