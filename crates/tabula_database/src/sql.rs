//! SQL rendering for `QuerySpec`s.
//!
//! Identifiers are double-quoted and every value is sent as a text bind
//! parameter. Only the window bounds, which are integers, are inlined.

use tabula_core::{Predicate, QuerySpec, RelationDescriptor};

/// Alias of the queried table inside rendered statements.
const BASE: &str = "\"base\"";

/// Alias of the lateral row that joins base columns with relation values.
const ROW: &str = "\"row_data\"";

/// A statement and its positional text parameters (`$1..$n`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQuery {
    /// SQL text
    pub sql: String,
    /// Values for `$1..$n`, in order
    pub binds: Vec<String>,
}

/// Quote an identifier, doubling embedded quotes.
///
/// ```
/// use tabula_database::quote_ident;
///
/// assert_eq!(quote_ident("users"), "\"users\"");
/// assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Escape LIKE metacharacters so the text matches literally under `ESCAPE '\'`.
///
/// ```
/// use tabula_database::escape_like;
///
/// assert_eq!(escape_like("50%_off"), "50\\%\\_off");
/// ```
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Default)]
struct Writer {
    sql: String,
    binds: Vec<String>,
}

impl Writer {
    fn bind(&mut self, value: impl Into<String>) -> String {
        self.binds.push(value.into());
        format!("${}", self.binds.len())
    }

    fn predicate(&mut self, predicate: &Predicate) -> String {
        match predicate {
            Predicate::Equals { column, value } => {
                let param = self.bind(value.as_str());
                format!("CAST({}.{} AS TEXT) = {}", BASE, quote_ident(column), param)
            }
            Predicate::Contains {
                column,
                needle,
                case_sensitive,
            } => {
                let param = self.bind(format!("%{}%", escape_like(needle)));
                let op = if *case_sensitive { "LIKE" } else { "ILIKE" };
                format!(
                    "CAST({}.{} AS TEXT) {} {} ESCAPE '\\'",
                    BASE,
                    quote_ident(column),
                    op,
                    param
                )
            }
            Predicate::Any(inner) => self.chain(inner, " OR ", "FALSE"),
            Predicate::All(inner) => self.chain(inner, " AND ", "TRUE"),
        }
    }

    fn chain(&mut self, inner: &[Predicate], joiner: &str, empty: &str) -> String {
        if inner.is_empty() {
            return empty.to_string();
        }
        let parts: Vec<String> = inner.iter().map(|p| self.predicate(p)).collect();
        format!("({})", parts.join(joiner))
    }

    fn from_table(&mut self, spec: &QuerySpec) {
        self.sql
            .push_str(&format!(" FROM {} AS {}", quote_ident(spec.table()), BASE));
    }

    fn where_clause(&mut self, spec: &QuerySpec) {
        let conditions: Vec<String> = spec
            .conditions()
            .into_iter()
            .map(|p| self.predicate(p))
            .collect();
        if !conditions.is_empty() {
            self.sql.push_str(" WHERE ");
            self.sql.push_str(&conditions.join(" AND "));
        }
    }

    fn finish(self) -> RenderedQuery {
        RenderedQuery {
            sql: self.sql,
            binds: self.binds,
        }
    }
}

fn relation_subquery(relation: &RelationDescriptor, index: usize) -> String {
    let alias = quote_ident(&format!("rel_{}", index));
    let join = format!(
        "{}.{} = {}.{}",
        alias,
        quote_ident(relation.related_column()),
        BASE,
        quote_ident(relation.parent_column())
    );
    let table = quote_ident(relation.table());
    let body = if relation.kind().is_many() {
        format!(
            "SELECT COALESCE(json_agg({alias}), '[]'::json) FROM {table} AS {alias} WHERE {join}"
        )
    } else {
        format!("SELECT row_to_json({alias}) FROM {table} AS {alias} WHERE {join} LIMIT 1")
    };
    format!("({}) AS {}", body, quote_ident(relation.name()))
}

/// Count of rows matching the scope and search filter.
///
/// Relations, ordering and window are ignored.
pub fn render_count(spec: &QuerySpec) -> RenderedQuery {
    let mut writer = Writer::default();
    writer.sql.push_str("SELECT COUNT(*) AS count");
    writer.from_table(spec);
    writer.where_clause(spec);
    writer.finish()
}

/// Matching rows as JSON text, one `row_json` column per row.
///
/// Relation values are computed in a lateral select so that ordering and
/// the window apply to the outermost statement.
///
/// ```
/// use tabula_core::{Predicate, QuerySpec, SortDirection};
/// use tabula_database::render_select;
///
/// let mut spec = QuerySpec::for_table("users");
/// spec.filter(Predicate::contains("name", "ada", false))
///     .order_by("name", SortDirection::Asc)
///     .paginate(0, 10);
///
/// let rendered = render_select(&spec);
/// assert!(rendered.sql.contains("ILIKE $1"));
/// assert!(rendered.sql.ends_with("ORDER BY \"base\".\"name\" ASC LIMIT 10 OFFSET 0"));
/// assert_eq!(rendered.binds, vec!["%ada%".to_string()]);
/// ```
pub fn render_select(spec: &QuerySpec) -> RenderedQuery {
    let mut writer = Writer::default();
    writer
        .sql
        .push_str(&format!("SELECT row_to_json({})::text AS row_json", ROW));
    writer.from_table(spec);
    writer
        .sql
        .push_str(&format!(" CROSS JOIN LATERAL (SELECT {}.*", BASE));
    for (index, relation) in spec.relations().iter().enumerate() {
        writer.sql.push_str(", ");
        writer.sql.push_str(&relation_subquery(relation, index));
    }
    writer.sql.push_str(&format!(") AS {}", ROW));
    writer.where_clause(spec);

    if let Some(order) = spec.order() {
        writer.sql.push_str(&format!(
            " ORDER BY {}.{} {}",
            BASE,
            quote_ident(order.column()),
            order.direction().as_sql()
        ));
    }
    if let Some(window) = spec.window() {
        writer.sql.push_str(&format!(
            " LIMIT {} OFFSET {}",
            window.limit(),
            window.offset()
        ));
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::SortDirection;

    #[test]
    fn test_count_ignores_order_and_window() {
        let mut spec = QuerySpec::for_table("users");
        spec.order_by("name", SortDirection::Desc).paginate(5, 5);
        let rendered = render_count(&spec);
        assert_eq!(
            rendered.sql,
            "SELECT COUNT(*) AS count FROM \"users\" AS \"base\""
        );
        assert!(rendered.binds.is_empty());
    }

    #[test]
    fn test_scope_and_search_are_and_ed() {
        let mut spec = QuerySpec::for_table("users");
        spec.and_where(Predicate::equals("tenant_id", "7"))
            .filter(Predicate::any_column_contains(&["name", "email"], "a_b", true));
        let rendered = render_count(&spec);
        assert_eq!(
            rendered.sql,
            "SELECT COUNT(*) AS count FROM \"users\" AS \"base\" WHERE \
             CAST(\"base\".\"tenant_id\" AS TEXT) = $1 AND \
             (CAST(\"base\".\"name\" AS TEXT) LIKE $2 ESCAPE '\\' OR \
             CAST(\"base\".\"email\" AS TEXT) LIKE $3 ESCAPE '\\')"
        );
        assert_eq!(rendered.binds, vec!["7", "%a\\_b%", "%a\\_b%"]);
    }

    #[test]
    fn test_empty_chains() {
        let mut spec = QuerySpec::for_table("users");
        spec.filter(Predicate::Any(Vec::new()));
        assert!(render_count(&spec).sql.ends_with("WHERE FALSE"));
    }

    #[test]
    fn test_relations_render_as_subqueries() {
        let mut spec = QuerySpec::for_table("users");
        spec.with_relations([
            RelationDescriptor::has_many("posts", "posts", "user_id"),
            RelationDescriptor::belongs_to("team", "teams", "team_id"),
        ]);
        let sql = render_select(&spec).sql;
        assert!(sql.contains(
            "(SELECT COALESCE(json_agg(\"rel_0\"), '[]'::json) FROM \"posts\" AS \"rel_0\" \
             WHERE \"rel_0\".\"user_id\" = \"base\".\"id\") AS \"posts\""
        ));
        assert!(sql.contains(
            "(SELECT row_to_json(\"rel_1\") FROM \"teams\" AS \"rel_1\" \
             WHERE \"rel_1\".\"id\" = \"base\".\"team_id\" LIMIT 1) AS \"team\""
        ));
    }

    #[test]
    fn test_select_orders_outermost_rows() {
        let mut spec = QuerySpec::for_table("users");
        spec.with_relations([RelationDescriptor::has_many("posts", "posts", "user_id")])
            .filter(Predicate::contains("name", "foo", false))
            .order_by("id", SortDirection::Desc)
            .paginate(20, 10);
        let rendered = render_select(&spec);
        assert!(rendered.sql.starts_with(
            "SELECT row_to_json(\"row_data\")::text AS row_json FROM \"users\" AS \"base\" \
             CROSS JOIN LATERAL (SELECT \"base\".*, "
        ));
        assert!(rendered.sql.ends_with(
            ") AS \"row_data\" WHERE CAST(\"base\".\"name\" AS TEXT) ILIKE $1 ESCAPE '\\' \
             ORDER BY \"base\".\"id\" DESC LIMIT 10 OFFSET 20"
        ));
        assert_eq!(rendered.binds, vec!["%foo%"]);
    }

    #[test]
    fn test_select_without_relations() {
        let spec = QuerySpec::for_table("users");
        assert_eq!(
            render_select(&spec).sql,
            "SELECT row_to_json(\"row_data\")::text AS row_json FROM \"users\" AS \"base\" \
             CROSS JOIN LATERAL (SELECT \"base\".*) AS \"row_data\""
        );
    }

    #[test]
    fn test_identifiers_are_quoted() {
        let mut spec = QuerySpec::for_table("users\"; DROP TABLE users; --");
        spec.order_by("na\"me", SortDirection::Asc);
        let sql = render_select(&spec).sql;
        assert!(sql.contains("FROM \"users\"\"; DROP TABLE users; --\" AS \"base\""));
        assert!(sql.contains("\"na\"\"me\" ASC"));
    }
}
