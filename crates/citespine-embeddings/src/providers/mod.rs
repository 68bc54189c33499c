mod api;
mod hashed;

pub use api::ApiEmbedder;
pub use hashed::HashedEmbedder;
