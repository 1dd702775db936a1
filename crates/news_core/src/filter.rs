use std::collections::BTreeSet;

use crate::Article;

/// Narrows the held page to articles whose source is selected.
///
/// An empty selection means no filtering. Articles without a source never
/// match a non-empty selection. Page metadata is not affected, so the shown
/// count may legitimately differ from the server's total.
pub fn filter_by_source<'a>(articles: &'a [Article], selected: &BTreeSet<String>) -> Vec<&'a Article> {
    if selected.is_empty() {
        return articles.iter().collect();
    }
    articles
        .iter()
        .filter(|article| source_matches(article, selected))
        .collect()
}

/// Whether `article` survives the source filter `selected`.
pub fn source_matches(article: &Article, selected: &BTreeSet<String>) -> bool {
    selected.is_empty()
        || article
            .source
            .as_ref()
            .is_some_and(|name| selected.contains(name))
}
