//! Types that represent the data model: a transaction `Record` and the values it carries.
mod amount;
mod record;

pub use amount::{Amount, AmountError};
pub use record::{Investment, Kind, Record};
