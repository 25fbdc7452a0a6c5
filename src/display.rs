use crate::config::DisplayConfig;
use crate::twitter_message::{Category, MediaAttachment, TweetKey, TweetRecord};

/// Plain-text rendering of one feed entry: `@author [category]` followed by
/// the wrapped text and, optionally, one line per attachment.
pub fn format_tweet(
    key: TweetKey,
    record: &TweetRecord,
    category: Category,
    config: &DisplayConfig,
) -> String {
    let mut out = format!("#{} @{} [{}]\n", key, record.sender_handle, category);

    let width = config.wrap_width.max(20);
    let options = textwrap::Options::new(width)
        .initial_indent("  ")
        .subsequent_indent("  ");
    for line in textwrap::wrap(&record.body_text, options) {
        out.push_str(&line);
        out.push('\n');
    }

    if config.show_attachments {
        for attachment in &record.attachments {
            out.push_str("    ");
            out.push_str(&describe(attachment));
            out.push('\n');
        }
    }
    out
}

fn describe(attachment: &MediaAttachment) -> String {
    match attachment {
        MediaAttachment::Photo { url } => format!("photo: {}", url),
        MediaAttachment::Link { url } => format!("link: {}", url),
        MediaAttachment::Video {
            content_url,
            thumbnail_url,
        } => format!("video: {} (thumb {})", content_url, thumbnail_url),
        MediaAttachment::AnimatedImage {
            content_url,
            thumbnail_url: Some(thumb),
        } => format!("gif: {} (thumb {})", content_url, thumb),
        MediaAttachment::AnimatedImage { content_url, .. } => format!("gif: {}", content_url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twitter_message::Tag;
    use std::collections::BTreeSet;

    fn record(text: &str, attachments: Vec<MediaAttachment>) -> TweetRecord {
        TweetRecord {
            sender_handle: "lawrnce".to_string(),
            sender_avatar_url: "http://x/a.jpg".to_string(),
            body_text: text.to_string(),
            attachments,
            tags: BTreeSet::from([Tag::AnimatedGif]),
        }
    }

    #[test]
    fn test_header_and_body() {
        let out = format_tweet(
            3,
            &record("hello there", Vec::new()),
            Category::Text,
            &DisplayConfig::default(),
        );
        assert_eq!(out, "#3 @lawrnce [text]\n  hello there\n");
    }

    #[test]
    fn test_wraps_long_text() {
        let config = DisplayConfig {
            wrap_width: 20,
            ..DisplayConfig::default()
        };
        let out = format_tweet(
            0,
            &record("one two three four five six seven eight", Vec::new()),
            Category::Text,
            &config,
        );
        let body: Vec<&str> = out.lines().skip(1).collect();
        assert!(body.len() > 1);
        assert!(body.iter().all(|l| l.len() <= 20 && l.starts_with("  ")));
    }

    #[test]
    fn test_attachments_listed() {
        let gif = MediaAttachment::AnimatedImage {
            content_url: "https://video.twimg.com/a.mp4".to_string(),
            thumbnail_url: None,
        };
        let out = format_tweet(
            1,
            &record("look", vec![gif.clone()]),
            Category::AnimatedImage,
            &DisplayConfig::default(),
        );
        assert!(out.contains("[gif]"));
        assert!(out.ends_with("    gif: https://video.twimg.com/a.mp4\n"));

        let hidden = DisplayConfig {
            show_attachments: false,
            ..DisplayConfig::default()
        };
        let out = format_tweet(1, &record("look", vec![gif]), Category::AnimatedImage, &hidden);
        assert!(!out.contains("video.twimg.com"));
    }
}
