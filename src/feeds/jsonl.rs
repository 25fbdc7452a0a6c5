use super::MessageSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

/// Newline-delimited JSON, the framing the streaming endpoint uses.
///
/// Blank lines are keep-alives. Lines that are not JSON are logged and skipped
/// so one corrupt frame does not end the stream.
pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: AsyncBufRead + Unpin + Send> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl JsonLinesSource<BufReader<File>> {
    pub async fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open stream capture: {}", path.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl JsonLinesSource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> MessageSource for JsonLinesSource<R> {
    async fn next_message(&mut self) -> Result<Option<Value>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(raw) => return Ok(Some(raw)),
                Err(e) => warn!(line = self.line_no, error = %e, "skipping malformed stream line"),
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::feeds::pump;
    use crate::session;
    use crate::twitter_message::Category;
    use std::io::Write;

    const CAPTURE: &str = r#"{"text":"one","user":{"screen_name":"a","profile_image_url":"http://x/a.jpg"}}

{not json
{"text":"two","user":{"screen_name":"b","profile_image_url":"http://x/b.jpg"},"entities":{"media":[{"type":"photo","media_url":"http://x/p.jpg"}]}}
{"limit":{"track":12}}
"#;

    #[tokio::test]
    async fn test_skips_keep_alives_and_garbage() {
        let mut source = JsonLinesSource::new(CAPTURE.as_bytes());
        let mut seen = Vec::new();
        while let Some(raw) = source.next_message().await.unwrap() {
            seen.push(raw);
        }
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0]["text"], "one");
        assert!(seen[2].get("limit").is_some());
    }

    #[tokio::test]
    async fn test_pump_into_session() {
        let (handle, _events, _task) = session::spawn("anime", &Config::default());
        let mut source = JsonLinesSource::new(CAPTURE.as_bytes());

        let forwarded = pump(&mut source, &handle).await.unwrap();
        assert_eq!(forwarded, 3);
        assert_eq!(handle.filtered_keys().await.unwrap(), vec![1, 0]);
        assert_eq!(handle.count(Category::Photo).await.unwrap(), 1);
        assert_eq!(handle.count(Category::Text).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_open_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CAPTURE.as_bytes()).unwrap();
        let mut source = JsonLinesSource::open(file.path()).await.unwrap();
        assert!(source.next_message().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonLinesSource::open(&dir.path().join("missing.jsonl"))
            .await
            .is_err());
    }
}
