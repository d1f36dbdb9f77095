mod client;
mod error;
mod oem;
mod refresh;

#[cfg(test)]
pub(crate) use oem::tests::SAMPLE_OEM;

pub use client::FeedClient;
pub use error::FeedError;
pub use refresh::{refresh_once, Refresher};
