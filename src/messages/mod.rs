pub mod log;
pub mod types;

pub use log::MessageLog;
pub use types::{Message, Role, NO_RESPONSE_PLACEHOLDER};
