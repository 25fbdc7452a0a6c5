use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Sequential key assigned by the index on insert.
pub type TweetKey = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaAttachment {
    Photo {
        url: String,
    },
    Video {
        content_url: String,
        thumbnail_url: String,
    },
    AnimatedImage {
        content_url: String,
        thumbnail_url: Option<String>,
    },
    Link {
        url: String,
    },
}

impl MediaAttachment {
    /// The URL a viewer would open: the image, the mp4, or the link target.
    pub fn primary_url(&self) -> &str {
        match self {
            MediaAttachment::Photo { url } | MediaAttachment::Link { url } => url,
            MediaAttachment::Video { content_url, .. }
            | MediaAttachment::AnimatedImage { content_url, .. } => content_url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Photo,
    Link,
    Video,
    AnimatedGif,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetRecord {
    pub sender_handle: String,
    pub sender_avatar_url: String,
    pub body_text: String,
    pub attachments: Vec<MediaAttachment>,
    pub tags: BTreeSet<Tag>,
}

impl TweetRecord {
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Text,
    Photo,
    Video,
    AnimatedImage,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Text,
        Category::Photo,
        Category::Video,
        Category::AnimatedImage,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            Category::Text => 0,
            Category::Photo => 1,
            Category::Video => 2,
            Category::AnimatedImage => 3,
        }
    }

    fn bit(self) -> u8 {
        1 << self.index()
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Text => "text",
            Category::Photo => "photo",
            Category::Video => "video",
            Category::AnimatedImage => "gif",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Set of active categories, stored as a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Category>", into = "Vec<Category>")]
pub struct CategorySet(u8);

impl CategorySet {
    pub fn all() -> Self {
        Category::ALL.into_iter().collect()
    }

    pub fn empty() -> Self {
        CategorySet(0)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0 & category.bit() != 0
    }

    pub fn insert(&mut self, category: Category) {
        self.0 |= category.bit();
    }

    /// Flips membership and returns the new state.
    pub fn toggle(&mut self, category: Category) -> bool {
        self.0 ^= category.bit();
        self.contains(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> {
        let set = *self;
        Category::ALL.into_iter().filter(move |c| set.contains(*c))
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Category> for CategorySet {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut set = CategorySet::empty();
        for category in iter {
            set.insert(category);
        }
        set
    }
}

impl From<Vec<Category>> for CategorySet {
    fn from(categories: Vec<Category>) -> Self {
        categories.into_iter().collect()
    }
}

impl From<CategorySet> for Vec<Category> {
    fn from(set: CategorySet) -> Self {
        set.iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Insertion {
    pub key: TweetKey,
    pub category: Category,
    pub passes_filter: bool,
    pub first_of_category: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterToggle {
    pub category: Category,
    pub active: bool,
    pub keys: Vec<TweetKey>,
}

/// What happened to one ingested tweet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Inserted(Insertion),
    Discarded(ParseError),
    /// Playback was paused, so the tweet was dropped unparsed.
    Paused,
}

#[derive(Debug, Clone)]
pub struct TwitterMessage {
    pub session_id: String,
    pub data: TwitterData,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TwitterData {
    Inserted(Insertion),
    FirstOfCategory(Category),
    Discarded(ParseError),
    Reset { keyword: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_set_defaults_to_all() {
        let set = CategorySet::default();
        for category in Category::ALL {
            assert!(set.contains(category));
        }
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let mut set = CategorySet::all();
        assert!(!set.toggle(Category::Video));
        assert!(!set.contains(Category::Video));
        assert!(set.toggle(Category::Video));
        assert_eq!(set, CategorySet::all());
    }

    #[test]
    fn test_category_set_iter_order() {
        let set: CategorySet = vec![Category::AnimatedImage, Category::Text].into();
        let listed: Vec<Category> = set.iter().collect();
        assert_eq!(listed, vec![Category::Text, Category::AnimatedImage]);
    }

    #[test]
    fn test_category_set_serde_as_list() {
        let set: CategorySet = vec![Category::Photo, Category::AnimatedImage].into();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["photo","animated_image"]"#);
        let back: CategorySet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_primary_url() {
        let video = MediaAttachment::Video {
            content_url: "https://video.example/a.mp4".to_string(),
            thumbnail_url: "https://pbs.example/a.jpg".to_string(),
        };
        assert_eq!(video.primary_url(), "https://video.example/a.mp4");
    }
}
