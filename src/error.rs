use crate::twitter_message::TweetKey;
use serde::Serialize;
use thiserror::Error;

/// Why a streamed message could not become a [`TweetRecord`](crate::twitter_message::TweetRecord).
///
/// Only the three required fields can fail a parse. They are checked in the
/// order handle, avatar, body and the first failure wins.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseError {
    #[error("tweet is missing the sender screen name")]
    MissingSenderHandle,
    #[error("tweet is missing the sender profile image url")]
    MissingAvatarUrl,
    #[error("tweet is missing its text")]
    MissingBodyText,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    #[error("no tweet stored under key {0}")]
    UnknownKey(TweetKey),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("stream session has stopped")]
    Closed,
    #[error(transparent)]
    Index(#[from] IndexError),
}
