//! Index record schema.
//!
//! Field names are serialized in camelCase; one record is one line of a
//! newline-delimited JSON index file.

use serde::{Deserialize, Serialize};

use crate::bm25::Weighted;

/// One overlapping window of a page's cleaned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRecord {
    pub id: String,
    pub source: String,
    pub version: String,
    pub language: String,
    /// Page path relative to the corpus root, `/`-separated.
    pub file: String,
    /// Level-1 heading of the page, or its first heading, or its path.
    pub section: String,
    pub heading_path: String,
    pub headings: Vec<String>,
    pub text: String,
}

/// One `<img>` from the `_images/` directory and the context around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: String,
    pub source: String,
    pub version: String,
    pub language: String,
    pub file: String,
    pub page_title: String,
    pub section: String,
    pub heading_path: String,
    pub headings: Vec<String>,
    /// Asset path relative to the corpus root.
    pub image: String,
    pub caption: Option<String>,
    pub alt: Option<String>,
    #[serde(default)]
    pub context_before: Option<String>,
    #[serde(default)]
    pub context_after: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Either kind of record, told apart by shape.
///
/// Image records are tried first: only they carry an `image` field, and
/// only text records carry `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexRecord {
    Image(ImageRecord),
    Text(TextRecord),
}

/// Id of the `ordinal`-th (1-based) segment of a page.
pub fn text_id(prefix: &str, file: &str, ordinal: usize) -> String {
    format!("{prefix}::{file}::{ordinal}")
}

/// Id of the `ordinal`-th (1-based) indexed image of a page.
pub fn image_id(
    prefix: &str,
    file: &str,
    image: &str,
    ordinal: usize,
) -> String {
    let basename = image.rsplit('/').next().unwrap_or(image);
    format!("{prefix}::{file}::{basename}::{ordinal}")
}

/// Text shown to a person browsing results.
pub trait Preview {
    /// Image path for image records, page path for text records.
    fn location(&self) -> &str;
    fn heading_path(&self) -> &str;
    fn caption(&self) -> Option<&str>;
    /// Surrounding prose, untruncated.
    fn context(&self) -> String;
}

impl Weighted for TextRecord {
    fn weighted_text(&self) -> String {
        [
            self.heading_path.as_str(),
            self.heading_path.as_str(),
            self.section.as_str(),
            self.text.as_str(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

impl Weighted for ImageRecord {
    /// Caption three times and heading path twice: both are written by
    /// the manual's authors to describe exactly this spot.
    fn weighted_text(&self) -> String {
        let caption = self.caption.as_deref();
        let context = self.context();
        let keywords = self.keywords.join(" ");
        [
            caption,
            caption,
            caption,
            Some(self.heading_path.as_str()),
            Some(self.heading_path.as_str()),
            Some(context.as_str()),
            Some(self.page_title.as_str()),
            self.alt.as_deref(),
            Some(keywords.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

impl Weighted for IndexRecord {
    fn weighted_text(&self) -> String {
        match self {
            Self::Image(r) => r.weighted_text(),
            Self::Text(r) => r.weighted_text(),
        }
    }
}

impl Preview for TextRecord {
    fn location(&self) -> &str {
        &self.file
    }

    fn heading_path(&self) -> &str {
        &self.heading_path
    }

    fn caption(&self) -> Option<&str> {
        None
    }

    fn context(&self) -> String {
        self.text.clone()
    }
}

impl Preview for ImageRecord {
    fn location(&self) -> &str {
        &self.image
    }

    fn heading_path(&self) -> &str {
        &self.heading_path
    }

    fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    fn context(&self) -> String {
        [self.context_before.as_deref(), self.context_after.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }
}

impl Preview for IndexRecord {
    fn location(&self) -> &str {
        match self {
            Self::Image(r) => r.location(),
            Self::Text(r) => r.location(),
        }
    }

    fn heading_path(&self) -> &str {
        match self {
            Self::Image(r) => Preview::heading_path(r),
            Self::Text(r) => Preview::heading_path(r),
        }
    }

    fn caption(&self) -> Option<&str> {
        match self {
            Self::Image(r) => Preview::caption(r),
            Self::Text(r) => Preview::caption(r),
        }
    }

    fn context(&self) -> String {
        match self {
            Self::Image(r) => r.context(),
            Self::Text(r) => r.context(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn image(caption: Option<&str>, heading_path: &str) -> ImageRecord {
        ImageRecord {
            id: "m::page.html::v.png::1".to_string(),
            source: "Manual".to_string(),
            version: "1.0".to_string(),
            language: "en".to_string(),
            file: "page.html".to_string(),
            page_title: "Page".to_string(),
            section: "Page".to_string(),
            heading_path: heading_path.to_string(),
            headings: heading_path
                .split(" / ")
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            image: "_images/v.png".to_string(),
            caption: caption.map(str::to_string),
            alt: None,
            context_before: None,
            context_after: None,
            keywords: Vec::new(),
        }
    }
}
