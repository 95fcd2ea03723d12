//! Parsing helpers shared by type inference, formatting and expansion.

pub mod datetime;
pub mod numeric;

pub use datetime::parse_date;
pub use numeric::parse_float_prefix;
