pub mod entry;
pub mod source;

pub use entry::{Entry, EntryFields};
pub use source::{Credentials, FeedSource, FeedSourceFields};
