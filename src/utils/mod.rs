//! Utility functions

pub mod crypto;
pub mod serde_ext;
pub mod time;
pub mod validation;

pub use crypto::{generate_hex_token, hash_string};
pub use time::{month_containing, month_range, period_range};
pub use validation::{fits_money_column, sanitize_file_name, sanitize_string};
