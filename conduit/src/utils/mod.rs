pub mod names;

pub use names::{qualified_parameter_name, sanitize_locator, sanitize_name, split_locator};
