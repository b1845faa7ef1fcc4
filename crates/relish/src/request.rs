use chrono::NaiveDateTime;

/// An immutable description of one client query, as handed over by the host
/// framework's request parsing.
#[derive(Debug, Clone)]
pub struct Request {
    /// Raw `where` clause, in either filter syntax
    pub where_: Option<String>,

    /// Raw `sort` clause
    pub sort: Option<String>,

    /// Raw `projection` clause (JSON)
    pub projection: Option<String>,

    /// Raw `embedded` clause (JSON)
    pub embedded: Option<String>,

    /// 1-based page number
    pub page: u64,

    /// Page size; `0` disables pagination
    pub max_results: u64,

    /// Conditional-freshness timestamp (`If-Modified-Since`)
    pub if_modified_since: Option<NaiveDateTime>,

    /// Client explicitly asked to see soft-deleted items
    pub show_deleted: bool,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_(mut self, clause: impl Into<String>) -> Self {
        self.where_ = Some(clause.into());
        self
    }

    pub fn sort(mut self, clause: impl Into<String>) -> Self {
        self.sort = Some(clause.into());
        self
    }

    pub fn projection(mut self, clause: impl Into<String>) -> Self {
        self.projection = Some(clause.into());
        self
    }

    pub fn embedded(mut self, clause: impl Into<String>) -> Self {
        self.embedded = Some(clause.into());
        self
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    pub fn max_results(mut self, max_results: u64) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn if_modified_since(mut self, since: NaiveDateTime) -> Self {
        self.if_modified_since = Some(since);
        self
    }

    pub fn show_deleted(mut self) -> Self {
        self.show_deleted = true;
        self
    }
}

impl Default for Request {
    fn default() -> Self {
        Self {
            where_: None,
            sort: None,
            projection: None,
            embedded: None,
            page: 1,
            max_results: 0,
            if_modified_since: None,
            show_deleted: false,
        }
    }
}
