pub mod money;
pub mod validation;

pub use money::{max_amount, normalize_amount};
pub use validation::{check_max_len, optional_text, required_text};
