use std::collections::HashSet;

use crate::bm25::tokenize;

/// Most keywords stored per image.
pub const MAX_KEYWORDS: usize = 14;

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "to", "of", "in", "on", "for", "with", "by",
    "from", "as", "is", "are", "was", "were", "be", "been", "this", "that",
    "these", "those", "it", "its", "at", "into", "out", "over", "under",
    "above", "below", "between", "after", "before", "about", "within",
    "without", "via", "using", "use", "used", "example",
];

/// Split a path into its directory and file-stem words.
///
/// `modeling/meshes/edit_mode.html` yields `modeling`, `meshes`, `edit`,
/// `mode`.
pub fn path_tokens(path: &str) -> Vec<&str> {
    let path = path.strip_suffix(".html").unwrap_or(path);
    path.split(['/', '\\'])
        .flat_map(|part| part.split(['_', '-']))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Pick distinctive keywords from an image's descriptive fields.
///
/// Sources are read in order; the first [`MAX_KEYWORDS`] unique tokens
/// longer than two characters that are not stopwords are kept.
pub fn build_keywords<'a>(sources: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let joined = sources
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let mut seen = HashSet::new();
    tokenize(&joined)
        .into_iter()
        .filter(|t| t.chars().count() > 2 && !STOPWORDS.contains(&t.as_str()))
        .filter(|t| seen.insert(t.clone()))
        .take(MAX_KEYWORDS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_tokens_split_on_separators() {
        assert_eq!(
            path_tokens("modeling/meshes/edit_mode-tools.html"),
            vec!["modeling", "meshes", "edit", "mode", "tools"]
        );
        assert_eq!(path_tokens("_images/v.png"), vec!["images", "v.png"]);
    }

    #[test]
    fn drops_stopwords_and_short_tokens() {
        let keywords = build_keywords(["Select the vertex in an edit mode"]);
        assert_eq!(keywords, vec!["select", "vertex", "edit", "mode"]);
    }

    #[test]
    fn deduplicates_in_first_seen_order() {
        let keywords = build_keywords(["Vertex Select", "", "vertex normals"]);
        assert_eq!(keywords, vec!["vertex", "select", "normals"]);
    }

    #[test]
    fn caps_keyword_count() {
        let many = (0..40).map(|i| format!("word{i}")).collect::<Vec<_>>();
        let keywords = build_keywords(many.iter().map(String::as_str));
        assert_eq!(keywords.len(), MAX_KEYWORDS);
        assert_eq!(keywords[0], "word0");
    }
}
