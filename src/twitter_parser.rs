use crate::error::ParseError;
use crate::twitter_message::{MediaAttachment, Tag, TweetRecord};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// Value the streaming API puts in a field instead of leaving it out.
pub const MISSING: &str = "-1";

/// Highest mp4 bitrate accepted for playback. Animated GIF variants report 0.
pub const MAX_VARIANT_BITRATE: u64 = 832_000;

const MP4: &str = "video/mp4";

#[derive(Debug, Deserialize)]
struct ApiMedia {
    #[serde(rename = "type")]
    kind: Option<String>,
    media_url: Option<String>,
    video_info: Option<ApiVideoInfo>,
}

#[derive(Debug, Deserialize)]
struct ApiVideoInfo {
    #[serde(default)]
    variants: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ApiVariant {
    content_type: Option<String>,
    bitrate: Option<u64>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiLink {
    url: Option<String>,
}

/// Parse one streamed tweet document into a [`TweetRecord`].
///
/// Screen name, profile image url and text are required. Media and links are
/// best effort: a malformed or absent section contributes nothing.
pub fn parse_tweet(raw: &Value) -> Result<TweetRecord, ParseError> {
    let sender_handle = required(raw, "/user/screen_name", ParseError::MissingSenderHandle)?;
    let sender_avatar_url = required(
        raw,
        "/user/profile_image_url",
        ParseError::MissingAvatarUrl,
    )?;
    let body_text = required(raw, "/text", ParseError::MissingBodyText)?;

    let mut attachments = Vec::new();
    let mut tags = BTreeSet::new();

    for entry in entries(raw, "/extended_entities/media") {
        if let Some((attachment, tag)) = parse_extended_media(entry) {
            attachments.push(attachment);
            tags.insert(tag);
        }
    }

    for entry in entries(raw, "/entities/media") {
        if let Some(photo) = parse_photo(entry) {
            attachments.push(photo);
            tags.insert(Tag::Photo);
        }
    }

    for entry in entries(raw, "/entities/urls") {
        let Ok(link) = ApiLink::deserialize(entry) else {
            continue;
        };
        if let Some(url) = present_url(link.url) {
            attachments.push(MediaAttachment::Link { url });
            tags.insert(Tag::Link);
        }
    }

    Ok(TweetRecord {
        sender_handle,
        sender_avatar_url,
        body_text,
        attachments,
        tags,
    })
}

fn required(raw: &Value, pointer: &str, error: ParseError) -> Result<String, ParseError> {
    match raw.pointer(pointer).and_then(Value::as_str) {
        Some(value) if value != MISSING => Ok(value.to_string()),
        _ => Err(error),
    }
}

fn entries<'a>(raw: &'a Value, pointer: &str) -> impl Iterator<Item = &'a Value> {
    raw.pointer(pointer)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn present_url(url: Option<String>) -> Option<String> {
    url.filter(|u| !u.is_empty() && u != MISSING)
}

fn parse_photo(entry: &Value) -> Option<MediaAttachment> {
    let media = ApiMedia::deserialize(entry).ok()?;
    if media.kind.as_deref() != Some("photo") {
        return None;
    }
    let url = present_url(media.media_url)?;
    Some(MediaAttachment::Photo { url })
}

fn parse_extended_media(entry: &Value) -> Option<(MediaAttachment, Tag)> {
    let media = ApiMedia::deserialize(entry).ok()?;
    let tag = match media.kind.as_deref() {
        Some("video") => Tag::Video,
        Some("animated_gif") => Tag::AnimatedGif,
        _ => return None,
    };

    if media.media_url.as_deref() == Some(MISSING) {
        return None;
    }
    let thumbnail_url = present_url(media.media_url);

    let variant = media
        .video_info?
        .variants
        .iter()
        .filter_map(|v| ApiVariant::deserialize(v).ok())
        .filter(|v| v.content_type.as_deref() == Some(MP4))
        .filter(|v| v.bitrate.unwrap_or(0) <= MAX_VARIANT_BITRATE)
        .min_by_key(|v| v.bitrate.unwrap_or(0))?;
    let content_url = present_url(variant.url)?;

    let attachment = match tag {
        Tag::Video => MediaAttachment::Video {
            content_url,
            thumbnail_url: thumbnail_url?,
        },
        _ => MediaAttachment::AnimatedImage {
            content_url,
            thumbnail_url,
        },
    };
    Some((attachment, tag))
}
