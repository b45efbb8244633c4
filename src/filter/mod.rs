pub mod filters;
pub mod metadata;

pub use filters::Filters;
pub use metadata::Metadata;
