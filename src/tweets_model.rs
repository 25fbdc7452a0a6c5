use crate::error::IndexError;
use crate::twitter_message::{
    Category, CategorySet, FilterToggle, Insertion, Tag, TweetKey, TweetRecord,
};

/// Resolve a record's single display category.
///
/// Heavier media wins: video, then animated gif, then photo. Anything else is
/// text.
pub fn classify(record: &TweetRecord) -> Category {
    if record.has_tag(Tag::Video) {
        Category::Video
    } else if record.has_tag(Tag::AnimatedGif) {
        Category::AnimatedImage
    } else if record.has_tag(Tag::Photo) {
        Category::Photo
    } else {
        Category::Text
    }
}

#[derive(Debug, Clone)]
struct StoredTweet {
    record: TweetRecord,
    category: Category,
}

/// Append-only store of parsed tweets with one key list per category.
///
/// Keys are handed out sequentially from 0 and index straight into `tweets`.
/// Each key lives in exactly one category list, and every list is ascending.
#[derive(Debug, Clone, Default)]
pub struct TweetIndex {
    tweets: Vec<StoredTweet>,
    lists: [Vec<TweetKey>; 4],
    filter: CategorySet,
}

impl TweetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: TweetRecord) -> Insertion {
        let key = self.tweets.len();
        let category = classify(&record);
        self.tweets.push(StoredTweet { record, category });

        let list = &mut self.lists[category.index()];
        let first_of_category = list.is_empty();
        list.push(key);

        Insertion {
            key,
            category,
            passes_filter: self.filter.contains(category),
            first_of_category,
        }
    }

    pub fn toggle_filter(&mut self, category: Category) -> FilterToggle {
        let active = self.filter.toggle(category);
        FilterToggle {
            category,
            active,
            keys: self.filtered_keys(),
        }
    }

    /// Keys of every tweet in an active category, newest first.
    pub fn filtered_keys(&self) -> Vec<TweetKey> {
        let mut keys: Vec<TweetKey> = self
            .filter
            .iter()
            .flat_map(|c| self.lists[c.index()].iter().copied())
            .collect();
        keys.sort_unstable_by(|a, b| b.cmp(a));
        keys
    }

    pub fn record(&self, key: TweetKey) -> Result<(&TweetRecord, Category), IndexError> {
        self.tweets
            .get(key)
            .map(|stored| (&stored.record, stored.category))
            .ok_or(IndexError::UnknownKey(key))
    }

    pub fn count(&self, category: Category) -> usize {
        self.lists[category.index()].len()
    }

    pub fn keys_for(&self, category: Category) -> &[TweetKey] {
        &self.lists[category.index()]
    }

    pub fn is_active(&self, category: Category) -> bool {
        self.filter.contains(category)
    }

    pub fn active_filter(&self) -> CategorySet {
        self.filter
    }

    pub fn len(&self) -> usize {
        self.tweets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweets.is_empty()
    }

    /// Drop every tweet and re-arm the first-of-category signals for a new
    /// stream. The filter goes back to all categories.
    pub fn reset(&mut self) {
        self.tweets.clear();
        for list in &mut self.lists {
            list.clear();
        }
        self.filter = CategorySet::all();
    }
}
