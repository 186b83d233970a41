pub mod channels;

pub use channels::{CompletionChannel, CompletionSender};
