pub mod errors;

pub use errors::{CredError, Result};
