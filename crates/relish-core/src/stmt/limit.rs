/// Traditional limit/offset pagination. The orchestrator computes the
/// offset from the 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit {
    pub limit: u64,
    pub offset: Option<u64>,
}

impl Limit {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            offset: None,
        }
    }

    /// Limit and offset for a 1-based page of `max_results` rows.
    pub fn paginate(page: u64, max_results: u64) -> Self {
        Self {
            limit: max_results,
            offset: if page > 1 {
                Some((page - 1) * max_results)
            } else {
                None
            },
        }
    }
}
