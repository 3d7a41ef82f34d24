use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::OrderBy;
use crate::validate::{require, url, Validate, ValidationError};
use crate::Record;

/// A post on the public blog. Newest `date` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Record)]
#[record(collection = "blog_posts", label = "Blog post")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl BlogPost {
    pub fn listing_order() -> OrderBy {
        OrderBy::desc("date")
    }

    /// Shown on the public blog. Unset means draft.
    pub fn is_published(&self) -> bool {
        self.published.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPostDraft {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub date: NaiveDate,
    pub image_url: Option<String>,
    pub published: bool,
}

impl Validate for BlogPostDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("excerpt", &self.excerpt)?;
        require("content", &self.content)?;
        require("author", &self.author)?;
        match self.image_url.as_deref() {
            Some(link) => url("image_url", link),
            None => Ok(()),
        }
    }
}
