pub mod duration;
pub mod error;
pub mod fields;
pub mod filter;
pub mod loader;
pub mod output;
pub mod pager;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod selection;
pub mod sources;
pub mod stats;
