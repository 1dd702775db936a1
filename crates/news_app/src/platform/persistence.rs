use std::fs;
use std::path::{Path, PathBuf};

use news_core::QuerySnapshot;
use news_engine::AtomicFileWriter;
use news_logging::{news_error, news_info, news_warn};
use serde::{Deserialize, Serialize};

const STATE_FILENAME: &str = ".news_tracker_state.ron";

/// Source selections are left out: they only mean something against the
/// sources discovered by a live search.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedQuery {
    companies: Vec<String>,
    time_range_days: u32,
    #[serde(default)]
    domains: Vec<String>,
}

pub(crate) fn load_query(output_dir: &Path) -> Option<QuerySnapshot> {
    let path = output_dir.join(STATE_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            news_warn!("Failed to read saved query from {:?}: {}", path, err);
            return None;
        }
    };

    let saved: PersistedQuery = match ron::from_str(&content) {
        Ok(saved) => saved,
        Err(err) => {
            news_warn!("Failed to parse saved query from {:?}: {}", path, err);
            return None;
        }
    };

    news_info!(
        "Loaded saved query with {} companies from {:?}",
        saved.companies.len(),
        path
    );
    Some(QuerySnapshot {
        companies: saved.companies,
        time_range_days: saved.time_range_days,
        sources: Vec::new(),
        domains: saved.domains,
    })
}

pub(crate) fn save_query(output_dir: &Path, query: &QuerySnapshot) {
    let saved = PersistedQuery {
        companies: query.companies.clone(),
        time_range_days: query.time_range_days,
        domains: query.domains.clone(),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&saved, pretty) {
        Ok(text) => text,
        Err(err) => {
            news_error!("Failed to serialize query: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(PathBuf::from(output_dir));
    if let Err(err) = writer.write(STATE_FILENAME, content.as_bytes()) {
        news_error!("Failed to save query to {:?}: {}", output_dir, err);
    }
}
