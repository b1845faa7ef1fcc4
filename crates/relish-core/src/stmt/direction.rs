use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// Maps the numeric direction flag used by the sort grammar: `-1` is
    /// descending, anything else ascending.
    pub fn from_flag(flag: i64) -> Self {
        if flag == -1 {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub fn is_desc(self) -> bool {
        matches!(self, Self::Desc)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => "asc".fmt(f),
            Self::Desc => "desc".fmt(f),
        }
    }
}
