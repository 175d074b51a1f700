pub mod calculator;
pub mod clock;
pub mod records;

pub use calculator::{compute_streak, StreakCalculator};
pub use clock::{parse_reference_date, DayClock};
pub use records::parse_records;
