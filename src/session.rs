//! The single task that owns a [`TweetIndex`].
//!
//! Tweets arrive from the stream while filter toggles arrive from the user, and
//! both touch the same key counter and category lists. Every operation is sent
//! as a command over one channel and applied in order by the session task, so
//! an insert is never observed half-applied. The task never waits on the event
//! consumer.

use crate::config::Config;
use crate::error::{IndexError, SessionError};
use crate::tweets_model::TweetIndex;
use crate::twitter_message::{
    Category, FilterToggle, IngestOutcome, TweetKey, TweetRecord, TwitterData, TwitterMessage,
};
use crate::twitter_parser::parse_tweet;
use serde_json::Value;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug)]
enum Command {
    Ingest {
        raw: Value,
        reply: oneshot::Sender<IngestOutcome>,
    },
    ToggleFilter {
        category: Category,
        reply: oneshot::Sender<FilterToggle>,
    },
    TogglePlayback {
        reply: oneshot::Sender<bool>,
    },
    Reset {
        keyword: String,
        reply: oneshot::Sender<()>,
    },
    FilteredKeys {
        reply: oneshot::Sender<Vec<TweetKey>>,
    },
    Record {
        key: TweetKey,
        reply: oneshot::Sender<Result<(TweetRecord, Category), IndexError>>,
    },
    Count {
        category: Category,
        reply: oneshot::Sender<usize>,
    },
}

/// Cloneable front door to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
}

struct Session {
    index: TweetIndex,
    keyword: String,
    playback: bool,
    commands: mpsc::Receiver<Command>,
    events: mpsc::Sender<TwitterMessage>,
}

/// Start a session task tracking `keyword`.
///
/// The task stops once every [`SessionHandle`] is dropped. Events for the UI
/// come out of the returned receiver.
pub fn spawn(
    keyword: impl Into<String>,
    config: &Config,
) -> (SessionHandle, mpsc::Receiver<TwitterMessage>, JoinHandle<()>) {
    let (command_tx, command_rx) = mpsc::channel(config.channel_capacity);
    let (event_tx, event_rx) = mpsc::channel(config.channel_capacity);

    let session = Session {
        index: TweetIndex::new(),
        keyword: keyword.into(),
        playback: true,
        commands: command_rx,
        events: event_tx,
    };
    let task = tokio::spawn(session.run());

    (
        SessionHandle {
            commands: command_tx,
        },
        event_rx,
        task,
    )
}

pub fn session_id(keyword: &str) -> String {
    format!("stream-{}", keyword)
}

impl Session {
    async fn run(mut self) {
        info!(keyword = %self.keyword, "stream session started");
        while let Some(command) = self.commands.recv().await {
            self.apply(command);
        }
        info!(
            keyword = %self.keyword,
            tweets = self.index.len(),
            "stream session stopped"
        );
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Ingest { raw, reply } => {
                let _ = reply.send(self.ingest(raw));
            }
            Command::ToggleFilter { category, reply } => {
                let toggle = self.index.toggle_filter(category);
                debug!(%category, active = toggle.active, "filter toggled");
                let _ = reply.send(toggle);
            }
            Command::TogglePlayback { reply } => {
                self.playback = !self.playback;
                info!(playback = self.playback, "playback toggled");
                let _ = reply.send(self.playback);
            }
            Command::Reset { keyword, reply } => {
                info!(from = %self.keyword, to = %keyword, "resetting stream session");
                self.index.reset();
                self.keyword = keyword.clone();
                self.emit(TwitterData::Reset { keyword });
                let _ = reply.send(());
            }
            Command::FilteredKeys { reply } => {
                let _ = reply.send(self.index.filtered_keys());
            }
            Command::Record { key, reply } => {
                let result = self
                    .index
                    .record(key)
                    .map(|(record, category)| (record.clone(), category));
                let _ = reply.send(result);
            }
            Command::Count { category, reply } => {
                let _ = reply.send(self.index.count(category));
            }
        }
    }

    fn ingest(&mut self, raw: Value) -> IngestOutcome {
        if !self.playback {
            debug!("playback paused, dropping tweet");
            return IngestOutcome::Paused;
        }

        match parse_tweet(&raw) {
            Ok(record) => {
                let insertion = self.index.insert(record);
                debug!(
                    key = insertion.key,
                    category = %insertion.category,
                    passes_filter = insertion.passes_filter,
                    "tweet inserted"
                );
                self.emit(TwitterData::Inserted(insertion));
                if insertion.first_of_category {
                    info!(category = %insertion.category, "first tweet of category");
                    self.emit(TwitterData::FirstOfCategory(insertion.category));
                }
                IngestOutcome::Inserted(insertion)
            }
            Err(error) => {
                warn!(%error, "discarding tweet");
                self.emit(TwitterData::Discarded(error));
                IngestOutcome::Discarded(error)
            }
        }
    }

    /// Never waits on the consumer: a full event channel drops the event.
    fn emit(&self, data: TwitterData) {
        let message = TwitterMessage {
            session_id: session_id(&self.keyword),
            data,
        };
        match self.events.try_send(message) {
            // A closed event channel only means nobody is rendering.
            Ok(()) | Err(TrySendError::Closed(_)) => {}
            Err(TrySendError::Full(message)) => {
                warn!(
                    session = %message.session_id,
                    event = ?message.data,
                    "event channel full, dropping event"
                );
            }
        }
    }
}

impl SessionHandle {
    /// Parse and store one raw tweet. The outcome carries the insertion
    /// (key, category, whether it passes the filter) or the parse error.
    pub async fn ingest(&self, raw: Value) -> Result<IngestOutcome, SessionError> {
        self.request(|reply| Command::Ingest { raw, reply }).await
    }

    pub async fn toggle_filter(&self, category: Category) -> Result<FilterToggle, SessionError> {
        self.request(|reply| Command::ToggleFilter { category, reply })
            .await
    }

    /// Pause or resume intake. Returns true when tweets are being accepted.
    pub async fn toggle_playback(&self) -> Result<bool, SessionError> {
        self.request(|reply| Command::TogglePlayback { reply }).await
    }

    /// Start over for a new keyword.
    pub async fn reset(&self, keyword: impl Into<String>) -> Result<(), SessionError> {
        let keyword = keyword.into();
        self.request(|reply| Command::Reset { keyword, reply }).await
    }

    pub async fn filtered_keys(&self) -> Result<Vec<TweetKey>, SessionError> {
        self.request(|reply| Command::FilteredKeys { reply }).await
    }

    pub async fn record(&self, key: TweetKey) -> Result<(TweetRecord, Category), SessionError> {
        Ok(self.request(|reply| Command::Record { key, reply }).await??)
    }

    pub async fn count(&self, category: Category) -> Result<usize, SessionError> {
        self.request(|reply| Command::Count { category, reply })
            .await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)
    }
}
