//! Seat ordering and roster filtering over an already-fetched roster.

pub mod display;
pub mod filter;
pub mod seat_label;

pub use display::{DaySuffixStyle, DaySuffixTable, RosterEntry};
pub use filter::{filter_and_sort, sort_by_seat, DayFilter, FilterSelection, RosterSource, StatusFilter};
pub use seat_label::{compare_seat_labels, ParsedSeat};
