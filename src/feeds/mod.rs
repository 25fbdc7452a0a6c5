pub mod jsonl;

use crate::session::SessionHandle;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

pub use jsonl::JsonLinesSource;

/// Something that delivers raw tweet documents one at a time, in arrival order.
#[async_trait]
pub trait MessageSource: Send {
    /// `Ok(None)` once the stream has ended.
    async fn next_message(&mut self) -> Result<Option<Value>>;
}

/// Forward every message from `source` into the session. Returns how many
/// messages were handed over.
pub async fn pump<S: MessageSource + ?Sized>(
    source: &mut S,
    session: &SessionHandle,
) -> Result<usize> {
    let mut forwarded = 0;
    while let Some(raw) = source.next_message().await? {
        session.ingest(raw).await?;
        forwarded += 1;
    }
    tracing::debug!(forwarded, "message source exhausted");
    Ok(forwarded)
}
