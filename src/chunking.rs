//! Splitting cleaned page text into overlapping segments.
//!
//! Segments are fixed-size character windows. Each window starts
//! `segment_size - overlap` characters after the previous one, so
//! neighbouring segments share `overlap` characters of context and a
//! passage cut by one boundary appears whole in the next segment.

use crate::error::{Error, Result};

/// Default window size in characters.
pub const DEFAULT_SEGMENT_SIZE: usize = 1000;

/// Default overlap between adjacent windows in characters.
pub const DEFAULT_SEGMENT_OVERLAP: usize = 120;

/// Trimmed windows this short or shorter are dropped.
pub const MIN_SEGMENT_CHARS: usize = 80;

/// Segmentation settings.
///
/// # Examples
///
/// ```
/// use manualdex::chunking::SegmentConfig;
///
/// assert!(SegmentConfig::new(1000, 120).is_ok());
/// assert!(SegmentConfig::new(100, 100).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentConfig {
    /// Window size in characters.
    pub segment_size: usize,
    /// Characters shared by adjacent windows; always below `segment_size`.
    pub overlap: usize,
    /// Windows whose trimmed length does not exceed this are discarded.
    pub min_chars: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            segment_size: DEFAULT_SEGMENT_SIZE,
            overlap: DEFAULT_SEGMENT_OVERLAP,
            min_chars: MIN_SEGMENT_CHARS,
        }
    }
}

impl SegmentConfig {
    pub fn new(segment_size: usize, overlap: usize) -> Result<Self> {
        if segment_size == 0 {
            return Err(Error::Config("segment size must be positive".into()));
        }
        if overlap >= segment_size {
            return Err(Error::Config(format!(
                "overlap ({overlap}) must be smaller than segment size \
                 ({segment_size})"
            )));
        }
        Ok(Self {
            segment_size,
            overlap,
            ..Self::default()
        })
    }

    /// Distance in characters between the starts of adjacent windows.
    pub fn step(&self) -> usize {
        self.segment_size.saturating_sub(self.overlap).max(1)
    }
}

/// A segment of a page's cleaned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The trimmed window text.
    pub text: String,
    /// Zero-based ordinal among the segments kept for the page.
    pub index: usize,
    /// Character offset where the window starts.
    pub start_offset: usize,
    /// Character offset of the first character kept after trimming.
    pub content_offset: usize,
}

/// Split text into overlapping character windows.
///
/// Windows are measured in `char`s, never bytes, so multi-byte text
/// (Japanese, emoji) is never cut inside a character. The loop stops
/// after the first window that reaches the end of the text.
///
/// # Examples
///
/// ```
/// use manualdex::chunking::{chunk_text, SegmentConfig};
///
/// let config = SegmentConfig::default();
///
/// // Too short to keep.
/// assert!(chunk_text("Hello, world!", &config).is_empty());
///
/// let text = "word ".repeat(500);
/// let chunks = chunk_text(&text, &config);
/// assert_eq!(chunks.len(), 3);
/// assert_eq!(chunks[1].start_offset, 880);
/// ```
pub fn chunk_text(text: &str, config: &SegmentConfig) -> Vec<Chunk> {
    let char_count = text.chars().count();

    // char index -> byte index, with one past-the-end entry
    let char_to_byte: Vec<usize> = text
        .char_indices()
        .map(|(byte_idx, _)| byte_idx)
        .chain(std::iter::once(text.len()))
        .collect();

    let step = config.step();
    let mut chunks = Vec::new();
    let mut start_char = 0;

    while start_char < char_count {
        let end_char = (start_char + config.segment_size).min(char_count);
        let window = &text[char_to_byte[start_char]..char_to_byte[end_char]];

        let leading = window.len() - window.trim_start().len();
        let trimmed = window.trim();
        if trimmed.chars().count() > config.min_chars {
            chunks.push(Chunk {
                text: trimmed.to_string(),
                index: chunks.len(),
                start_offset: start_char,
                content_offset: start_char + window[..leading].chars().count(),
            });
        }

        if end_char == char_count {
            break;
        }
        start_char += step;
    }

    chunks
}
