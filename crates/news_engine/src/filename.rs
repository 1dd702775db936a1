use chrono::{DateTime, Utc};

const MAX_STEM_LEN: usize = 80;

/// Windows-safe export name: `news_results_{Company_Company}_{unix_millis}.{extension}`.
pub fn export_filename(
    companies: &[String],
    generated_at: DateTime<Utc>,
    extension: &str,
) -> String {
    let joined = companies
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    let stem = sanitize_stem(&joined);
    format!(
        "news_results_{stem}_{}.{extension}",
        generated_at.timestamp_millis()
    )
}

fn sanitize_stem(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();

    // Collapse runs of underscores and spaces into a single underscore.
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' || c.is_whitespace() {
            if !prev_underscore {
                compacted.push('_');
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }

    let mut stem = compacted.trim_matches(&['_', '.'][..]).to_string();
    if stem.chars().count() > MAX_STEM_LEN {
        stem = stem.chars().take(MAX_STEM_LEN).collect();
    }
    if stem.is_empty() {
        stem = "untitled".to_string();
    }
    stem
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
