//! Japanese/English glossary used to widen queries across languages.

/// Japanese manual vocabulary and its English counterpart.
pub const JA_EN: &[(&str, &str)] = &[
    ("頂点", "vertex"),
    ("辺", "edge"),
    ("面", "face"),
    ("法線", "normal"),
    ("モデリング", "modeling"),
    ("レンダー", "render"),
    ("マテリアル", "material"),
    ("テクスチャ", "texture"),
    ("シェーダー", "shader"),
    ("ノード", "node"),
    ("ジオメトリ", "geometry"),
    ("コレクション", "collection"),
    ("アウトライナー", "outliner"),
    ("カメラ", "camera"),
    ("ライト", "light"),
    ("アニメーション", "animation"),
    ("リギング", "rigging"),
    ("スカルプト", "sculpt"),
    ("ベイク", "bake"),
    ("コンポジット", "compositing"),
    ("ビューポート", "viewport"),
];

/// Append both forms of every glossary pair the query mentions.
///
/// A pair matches when the query contains the Japanese term, or when the
/// lower-cased query contains the English term. Matching is by substring:
/// `"rendering"` matches `"render"` while `"vertices"` misses `"vertex"`.
///
/// # Examples
///
/// ```
/// use manualdex::glossary::expand_query;
///
/// assert_eq!(expand_query("頂点を選択"), "頂点を選択 頂点 vertex");
/// assert_eq!(expand_query("Vertex"), "Vertex 頂点 vertex");
/// assert_eq!(expand_query("menu"), "menu");
/// ```
pub fn expand_query(query: &str) -> String {
    expand_with(query, JA_EN)
}

/// [`expand_query`] over a caller-supplied glossary.
pub fn expand_with(query: &str, glossary: &[(&str, &str)]) -> String {
    let lower = query.to_lowercase();
    let extras = glossary
        .iter()
        .filter(|(ja, en)| query.contains(ja) || lower.contains(en))
        .flat_map(|(ja, en)| [*ja, *en]);

    std::iter::once(query).chain(extras).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn japanese_and_english_are_symmetric() {
        for query in ["頂点", "vertex"] {
            let expanded = expand_query(query);
            assert!(expanded.contains("頂点"), "{expanded}");
            assert!(expanded.contains("vertex"), "{expanded}");
        }
    }

    #[test]
    fn english_match_is_case_insensitive() {
        assert!(expand_query("CAMERA setup").contains("カメラ"));
    }

    #[test]
    fn multiple_terms_keep_glossary_order() {
        assert_eq!(
            expand_query("カメラ and vertex"),
            "カメラ and vertex 頂点 vertex カメラ camera"
        );
    }

    #[test]
    fn unrelated_query_is_unchanged() {
        assert_eq!(expand_query("preferences"), "preferences");
        assert_eq!(expand_query(""), "");
    }

    #[test]
    fn custom_glossary() {
        let glossary = [("猫", "cat")];
        assert_eq!(expand_with("cats", &glossary), "cats 猫 cat");
    }
}
