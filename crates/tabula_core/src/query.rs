//! Query descriptions threaded through the processing pipeline.

use crate::{RelationDescriptor, SortDirection};
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A row filter condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Text form of the column equals the value
    Equals {
        /// Column name
        column: String,
        /// Value to compare against
        value: String,
    },
    /// Text form of the column contains the needle anywhere
    Contains {
        /// Column name
        column: String,
        /// Substring to look for, matched literally
        needle: String,
        /// Whether letter case must match
        case_sensitive: bool,
    },
    /// At least one inner predicate holds (an OR chain)
    Any(Vec<Predicate>),
    /// Every inner predicate holds (an AND chain)
    All(Vec<Predicate>),
}

impl Predicate {
    /// Column equality.
    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Substring match on one column.
    pub fn contains(
        column: impl Into<String>,
        needle: impl Into<String>,
        case_sensitive: bool,
    ) -> Self {
        Predicate::Contains {
            column: column.into(),
            needle: needle.into(),
            case_sensitive,
        }
    }

    /// OR-chain of substring matches, one per column.
    ///
    /// ```
    /// use tabula_core::Predicate;
    ///
    /// let columns = vec!["name".to_string(), "email".to_string()];
    /// let predicate = Predicate::any_column_contains(&columns, "foo", false);
    /// match predicate {
    ///     Predicate::Any(inner) => assert_eq!(inner.len(), 2),
    ///     _ => panic!("expected an OR chain"),
    /// }
    /// ```
    pub fn any_column_contains<S: AsRef<str>>(
        columns: &[S],
        needle: &str,
        case_sensitive: bool,
    ) -> Self {
        Predicate::Any(
            columns
                .iter()
                .map(|column| Predicate::contains(column.as_ref(), needle, case_sensitive))
                .collect(),
        )
    }
}

/// Single-column ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_new::new)]
pub struct OrderBy {
    /// Column to sort on
    column: String,
    /// Sort direction
    direction: SortDirection,
}

/// Offset/limit window over the sorted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_new::new)]
pub struct PageWindow {
    /// Rows to skip
    offset: u64,
    /// Maximum rows to return
    limit: u64,
}

/// Query over one table, built up stage by stage.
///
/// Callers may hand a pre-scoped spec to the processor as the base query:
///
/// ```
/// use tabula_core::{Predicate, QuerySpecBuilder};
///
/// let base = QuerySpecBuilder::default()
///     .table("users")
///     .scope(vec![Predicate::equals("tenant_id", "7")])
///     .build()
///     .unwrap();
/// assert_eq!(base.table(), "users");
/// assert!(base.search().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into, strip_option))]
pub struct QuerySpec {
    /// Table being queried
    table: String,

    /// Base conditions, all of which must hold
    #[builder(default)]
    scope: Vec<Predicate>,

    /// Relations to load alongside each row
    #[builder(default)]
    relations: Vec<RelationDescriptor>,

    /// Search filter applied on top of the scope
    #[builder(default)]
    search: Option<Predicate>,

    /// Ordering
    #[builder(default)]
    order: Option<OrderBy>,

    /// Pagination window
    #[builder(default)]
    window: Option<PageWindow>,
}

impl QuerySpec {
    /// Select-all query over a table.
    pub fn for_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            scope: Vec::new(),
            relations: Vec::new(),
            search: None,
            order: None,
            window: None,
        }
    }

    /// Add relations to eager-load, skipping names already requested.
    pub fn with_relations<I>(&mut self, relations: I) -> &mut Self
    where
        I: IntoIterator<Item = RelationDescriptor>,
    {
        for relation in relations {
            if !self.relations.iter().any(|r| r.name() == relation.name()) {
                self.relations.push(relation);
            }
        }
        self
    }

    /// Add a base condition.
    pub fn and_where(&mut self, predicate: Predicate) -> &mut Self {
        self.scope.push(predicate);
        self
    }

    /// Set the search filter.
    ///
    /// A search filter already present moves into the scope, so it keeps
    /// restricting rows.
    pub fn filter(&mut self, predicate: Predicate) -> &mut Self {
        if let Some(previous) = self.search.replace(predicate) {
            self.scope.push(previous);
        }
        self
    }

    /// Set the ordering.
    pub fn order_by(&mut self, column: impl Into<String>, direction: SortDirection) -> &mut Self {
        self.order = Some(OrderBy::new(column.into(), direction));
        self
    }

    /// Skip `offset` rows and take at most `limit`.
    pub fn paginate(&mut self, offset: u64, limit: u64) -> &mut Self {
        self.window = Some(PageWindow::new(offset, limit));
        self
    }

    /// Every condition a row must satisfy: the scope plus the search filter.
    pub fn conditions(&self) -> Vec<&Predicate> {
        self.scope.iter().chain(self.search.as_ref()).collect()
    }
}
