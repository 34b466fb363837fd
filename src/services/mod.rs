pub mod expenses;
pub mod payment;
#[cfg(feature = "reports")]
pub mod reports;
pub mod roster;
pub mod session;
