use url::Url;

use crate::filter::source_matches;
use crate::page_window::{compute_window, PageToken};
use crate::{AppState, Article, ExportStatus};

const FALLBACK_SEARCH_BASE: &str = "https://www.google.com/search";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub companies: Vec<String>,
    pub time_range_days: u32,
    pub time_range_choices: Vec<u32>,
    pub domains: Vec<ChoiceView>,
    pub sources: Vec<ChoiceView>,
    pub articles: Vec<ArticleRowView>,
    pub page_tokens: Vec<PageToken>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub page_size: u32,
    pub range_summary: Option<String>,
    pub can_search: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub can_export: bool,
    pub export: ExportStatus,
}

/// A toggleable filter entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceView {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRowView {
    /// 1-based position in the full result set, unaffected by the source filter.
    pub position: u32,
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub company: String,
    pub source: Option<String>,
    pub published_at: String,
    /// Set when the article link is likely to hit a consent wall.
    pub fallback_search_url: Option<String>,
}

impl AppState {
    pub fn view(&self) -> AppViewModel {
        let query = &self.query;
        let meta = self.results.metadata();

        let domains = query
            .options()
            .domains
            .iter()
            .map(|d| ChoiceView {
                label: d.label.clone(),
                value: d.value.clone(),
                selected: query.selected_domains().contains(&d.value),
            })
            .collect();

        let sources = self
            .results
            .available_sources()
            .iter()
            .map(|name| ChoiceView {
                label: name.clone(),
                value: name.clone(),
                selected: query.selected_sources().contains(name),
            })
            .collect();

        let offset = meta.current_page.saturating_sub(1) * meta.page_size;
        let articles = self
            .results
            .articles()
            .iter()
            .zip(offset + 1..)
            .filter(|(article, _)| source_matches(article, query.selected_sources()))
            .map(|(article, position)| article_row(article, position))
            .collect();

        AppViewModel {
            companies: query.companies().to_vec(),
            time_range_days: query.time_range_days(),
            time_range_choices: query.options().time_ranges.clone(),
            domains,
            sources,
            articles,
            page_tokens: compute_window(meta.current_page, meta.total_pages),
            current_page: meta.current_page,
            total_pages: meta.total_pages,
            total_results: meta.total_results,
            page_size: meta.page_size,
            range_summary: meta
                .visible_range()
                .map(|(from, to)| format!("Showing {from}-{to} of {} articles", meta.total_results)),
            can_search: self.can_search(),
            loading: self.is_loading(),
            error: self.error.clone(),
            can_export: self.can_export() && !self.is_exporting(),
            export: self.export_status.clone(),
        }
    }
}

fn article_row(article: &Article, position: u32) -> ArticleRowView {
    ArticleRowView {
        position,
        id: article.id.clone(),
        title: article.title.clone(),
        description: article.description.clone(),
        url: article.url.clone(),
        company: article.company.clone(),
        source: article.source.clone(),
        published_at: article.published_at.clone(),
        fallback_search_url: fallback_search_url(article),
    }
}

/// Search link offered for articles that usually land on a consent page.
pub fn fallback_search_url(article: &Article) -> Option<String> {
    let source = article.source.as_deref().unwrap_or_default();
    let gated = article.url.contains("consent.yahoo.com")
        || source.to_lowercase().contains("yahoo");
    if !gated {
        return None;
    }
    let terms = format!("{} {}", article.title, source);
    Url::parse_with_params(FALLBACK_SEARCH_BASE, &[("q", terms.trim())])
        .ok()
        .map(String::from)
}
