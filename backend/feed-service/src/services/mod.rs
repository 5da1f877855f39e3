pub mod feed;
pub mod merge;
pub mod sources;

pub use feed::FeedAssembler;
pub use merge::merge_desc;
pub use sources::{ActivitySource, ContentActivitySource};
