use std::collections::BTreeSet;

/// Fixed number of articles requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A statically known domain filter entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainOption {
    pub label: String,
    pub value: String,
}

impl DomainOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Deployment-specific choices the query is validated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub time_ranges: Vec<u32>,
    pub default_time_range: u32,
    pub domains: Vec<DomainOption>,
}

impl QueryOptions {
    /// The original 7/30/90/180 day deployment.
    pub fn legacy() -> Self {
        Self {
            time_ranges: vec![7, 30, 90, 180],
            default_time_range: 30,
            ..Self::default()
        }
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            time_ranges: vec![7, 14, 21, 30],
            default_time_range: 7,
            domains: vec![
                DomainOption::new("MarketWatch", "marketwatch.com"),
                DomainOption::new("Yahoo", "yahoo.com"),
            ],
        }
    }
}

/// The query sent with every fetch, detached from the state that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuerySnapshot {
    pub companies: Vec<String>,
    pub time_range_days: u32,
    pub sources: Vec<String>,
    pub domains: Vec<String>,
}

/// Tracked companies, time window and source/domain selections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    options: QueryOptions,
    companies: Vec<String>,
    time_range_days: u32,
    selected_sources: BTreeSet<String>,
    selected_domains: BTreeSet<String>,
}

impl QueryState {
    pub fn new(options: QueryOptions) -> Self {
        let time_range_days = options.default_time_range;
        Self {
            options,
            companies: Vec::new(),
            time_range_days,
            selected_sources: BTreeSet::new(),
            selected_domains: BTreeSet::new(),
        }
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    pub fn has_companies(&self) -> bool {
        !self.companies.is_empty()
    }

    pub fn time_range_days(&self) -> u32 {
        self.time_range_days
    }

    pub fn selected_sources(&self) -> &BTreeSet<String> {
        &self.selected_sources
    }

    pub fn selected_domains(&self) -> &BTreeSet<String> {
        &self.selected_domains
    }

    /// Appends a company unless it is blank or already tracked. Names are
    /// stored exactly as given so `remove_company` sees the same string.
    /// Returns whether the list changed.
    pub fn add_company(&mut self, name: &str) -> bool {
        if name.trim().is_empty() || self.companies.iter().any(|c| c == name) {
            return false;
        }
        self.companies.push(name.to_string());
        true
    }

    /// Removes the first exact match. Returns whether the list changed.
    pub fn remove_company(&mut self, name: &str) -> bool {
        match self.companies.iter().position(|c| c == name) {
            Some(index) => {
                self.companies.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn toggle_source(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        if !self.selected_sources.remove(name) {
            self.selected_sources.insert(name.to_string());
        }
    }

    /// Toggles a domain by canonical value. Values outside the catalogue are
    /// ignored and `false` is returned.
    pub fn toggle_domain(&mut self, value: &str) -> bool {
        if !self.options.domains.iter().any(|d| d.value == value) {
            return false;
        }
        if !self.selected_domains.remove(value) {
            self.selected_domains.insert(value.to_string());
        }
        true
    }

    /// Replaces the time range if `days` is one of the configured choices.
    pub fn set_time_range(&mut self, days: u32) -> bool {
        if !self.options.time_ranges.contains(&days) {
            return false;
        }
        self.time_range_days = days;
        true
    }

    pub fn snapshot(&self) -> QuerySnapshot {
        QuerySnapshot {
            companies: self.companies.clone(),
            time_range_days: self.time_range_days,
            sources: self.selected_sources.iter().cloned().collect(),
            domains: self.selected_domains.iter().cloned().collect(),
        }
    }

    /// Rebuilds the query from a snapshot, applying the same validation as
    /// the individual operations. Invalid entries are dropped.
    pub fn restore(&mut self, snapshot: &QuerySnapshot) {
        let options = self.options.clone();
        *self = Self::new(options);
        for company in &snapshot.companies {
            self.add_company(company);
        }
        self.set_time_range(snapshot.time_range_days);
        for source in &snapshot.sources {
            if !self.selected_sources.contains(source) {
                self.toggle_source(source);
            }
        }
        for domain in &snapshot.domains {
            if !self.selected_domains.contains(domain) {
                self.toggle_domain(domain);
            }
        }
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(QueryOptions::default())
    }
}
