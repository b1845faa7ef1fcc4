/// The field subset a query returns. Field names are app-level attribute
/// names, not storage columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Projection {
    /// Return every scalar field
    #[default]
    All,

    /// Return only the named fields
    Fields(Vec<String>),
}

impl Projection {
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn fields(&self) -> Option<&[String]> {
        match self {
            Self::All => None,
            Self::Fields(fields) => Some(fields),
        }
    }

    /// Narrows this projection to the intersection with a client-requested
    /// field list. An empty request leaves the projection unchanged.
    pub fn narrow(&mut self, requested: &[String]) {
        if requested.is_empty() {
            return;
        }

        *self = match self {
            Self::All => Self::Fields(requested.to_vec()),
            Self::Fields(fields) => Self::Fields(
                fields
                    .iter()
                    .filter(|f| requested.contains(f))
                    .cloned()
                    .collect(),
            ),
        };
    }
}

impl From<Vec<String>> for Projection {
    fn from(fields: Vec<String>) -> Self {
        if fields.is_empty() {
            Self::All
        } else {
            Self::Fields(fields)
        }
    }
}
