//! Sort direction.

use serde::{Deserialize, Serialize};

/// Direction of the single-column sort.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Asc,
    /// Largest first
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(SortDirection::from_str("DESC").unwrap(), SortDirection::Desc);
        assert_eq!(SortDirection::from_str("asc").unwrap(), SortDirection::Asc);
        assert!(SortDirection::from_str("sideways").is_err());
    }

    #[test]
    fn test_display_matches_wire_form() {
        assert_eq!(SortDirection::Desc.to_string(), "desc");
        assert_eq!(SortDirection::Asc.as_sql(), "ASC");
    }
}
