//! Streamed tweets in, a categorized and filterable feed out.
//!
//! [`twitter_parser`] turns one raw stream document into a [`TweetRecord`],
//! [`tweets_model`] keeps the records keyed and indexed by category, and
//! [`session`] owns that index on a single task so stream inserts and filter
//! toggles never interleave.

pub mod config;
pub mod display;
pub mod error;
pub mod feeds;
pub mod session;
pub mod tweets_model;
pub mod twitter_message;
pub mod twitter_parser;

pub use error::{IndexError, ParseError, SessionError};
pub use session::SessionHandle;
pub use tweets_model::{classify, TweetIndex};
pub use twitter_message::{
    Category, CategorySet, FilterToggle, IngestOutcome, Insertion, MediaAttachment, Tag, TweetKey, TweetRecord,
    TwitterData, TwitterMessage,
};
pub use twitter_parser::parse_tweet;
