//! Request handlers

pub mod health;
pub mod values;

pub use health::{health_check, root_handler};
pub use values::{create_value, delete_value, get_value, list_values, slow_values, update_value};
