pub mod cli;
pub mod feeds;
pub mod gateway;

pub use feeds::newsapi::NewsApiClient;
pub use feeds::{FeedArticle, FeedClient, FeedEnvelope, FeedParams};
pub use gateway::{FetchConfig, FetchGateway};

pub mod prelude {
    pub use super::feeds::{FeedClient, FeedParams};
    pub use super::gateway::{FetchConfig, FetchGateway};
    pub use nr_core::{Error, RawArticle, Result};
}
