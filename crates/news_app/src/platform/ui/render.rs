use std::fmt::Write;

use chrono::Local;
use news_core::{AppViewModel, ArticleRowView, ChoiceView, ExportStatus, PageToken};
use news_engine::format_published;

/// Renders the whole view as plain text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== News Tracker ===");

    let companies = if view.companies.is_empty() {
        "(none, use 'add <company>')".to_string()
    } else {
        view.companies.join(", ")
    };
    let ranges = view
        .time_range_choices
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("/");
    let _ = writeln!(out, "Companies: {companies}");
    let _ = writeln!(
        out,
        "Range: last {} days (choices {ranges})",
        view.time_range_days
    );
    let _ = writeln!(out, "Domains: {}", choices(&view.domains));
    if !view.sources.is_empty() {
        let _ = writeln!(out, "Sources: {}", choices(&view.sources));
    }

    if view.loading {
        let _ = writeln!(out, "Searching...");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "Error: {error}");
    }

    if let Some(summary) = &view.range_summary {
        let _ = write!(out, "{summary}");
        if view.sources.iter().any(|s| s.selected) {
            let _ = write!(out, " ({} shown after source filter)", view.articles.len());
        }
        let _ = writeln!(out);
    } else if !view.loading && view.error.is_none() && view.can_search {
        let _ = writeln!(out, "No results yet, use 'search'.");
    }

    for row in &view.articles {
        render_article(&mut out, row);
    }

    if !view.page_tokens.is_empty() {
        let _ = writeln!(out, "Pages: {}", page_bar(&view.page_tokens, view.current_page));
    }

    match &view.export {
        ExportStatus::Idle => {}
        ExportStatus::Exporting => {
            let _ = writeln!(out, "Export: running...");
        }
        ExportStatus::Done(outcome) => {
            let _ = writeln!(
                out,
                "Export: wrote {} articles to {}",
                outcome.records,
                outcome.path.display()
            );
        }
        ExportStatus::Failed(message) => {
            let _ = writeln!(out, "Export failed: {message} (run 'export' to retry)");
        }
    }
    if view.can_export {
        let _ = writeln!(out, "Export available: {} articles", view.total_results);
    }
    out
}

fn choices(items: &[ChoiceView]) -> String {
    items
        .iter()
        .map(|item| {
            let mark = if item.selected { 'x' } else { ' ' };
            if item.label == item.value {
                format!("[{mark}] {}", item.label)
            } else {
                format!("[{mark}] {} ({})", item.label, item.value)
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn render_article(out: &mut String, row: &ArticleRowView) {
    let source = row.source.as_deref().unwrap_or("Unknown source");
    let _ = writeln!(out, "{:>4}. {}", row.position, row.title);
    let _ = writeln!(
        out,
        "      {} | {} | {}",
        row.company,
        source,
        format_published(&row.published_at, &Local)
    );
    if !row.description.is_empty() {
        let _ = writeln!(out, "      {}", row.description);
    }
    let _ = writeln!(out, "      {}", row.url);
    if let Some(search) = &row.fallback_search_url {
        let _ = writeln!(out, "      search: {search}");
    }
}

fn page_bar(tokens: &[PageToken], current: u32) -> String {
    tokens
        .iter()
        .map(|token| match token {
            PageToken::Page(page) if *page == current => format!("[{page}]"),
            other => other.label(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
