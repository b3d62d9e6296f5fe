//! Table queries in PostgREST terms.
//!
//! A [`Query`] names a table, a set of equality filters and an ordering. The
//! HTTP backend turns it into query-string parameters; in-memory backends can
//! evaluate it directly with [`Query::matches`] and [`Query::compare`].

use std::cmp::Ordering;

use serde_json::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// `column = value` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    /// Whether a row satisfies this filter.
    ///
    /// Values compare by their text form, the way they travel in a query string.
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        row.get(&self.column)
            .is_some_and(|cell| text_of(cell) == self.value)
    }
}

/// One ordering key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// A filtered, ordered view of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: String,
    filters: Vec<Filter>,
    order: Vec<Order>,
}

impl Query {
    /// Start a query against a table.
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: name.into(),
            filters: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Keep only rows where `column` equals `value`.
    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            value: value.to_string(),
        });
        self
    }

    /// Append an ordering key. Earlier keys take precedence.
    #[must_use]
    pub fn order(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order.push(Order {
            column: column.into(),
            direction,
        });
        self
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    #[must_use]
    pub fn ordering(&self) -> &[Order] {
        &self.order
    }

    /// PostgREST query-string parameters (without `select`).
    ///
    /// ```
    /// use nexus_accounts_client::{Direction, Query};
    ///
    /// let query = Query::table("user_addresses")
    ///     .eq("user_id", "abc")
    ///     .order("is_default", Direction::Desc)
    ///     .order("id", Direction::Asc);
    ///
    /// assert_eq!(
    ///     query.to_params(),
    ///     vec![
    ///         ("user_id".to_string(), "eq.abc".to_string()),
    ///         ("order".to_string(), "is_default.desc,id.asc".to_string()),
    ///     ]
    /// );
    /// ```
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|f| (f.column.clone(), format!("eq.{}", f.value)))
            .collect();

        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|o| format!("{}.{}", o.column, o.direction.as_str()))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_string(), order));
        }

        params
    }

    /// Whether a row satisfies every filter.
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    /// Compare two rows by this query's ordering.
    ///
    /// Rows equal on every key compare equal, so a stable sort keeps their
    /// original order. Missing and null cells sort first when descending, last
    /// when ascending, as Postgres does.
    #[must_use]
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        self.order
            .iter()
            .map(|o| {
                let ordering = compare_cells(
                    a.get(&o.column).unwrap_or(&Value::Null),
                    b.get(&o.column).unwrap_or(&Value::Null),
                );
                match o.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Text form of a JSON cell as it would appear in a filter.
fn text_of(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Total order over cells; nulls sort after everything else.
fn compare_cells(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => text_of(a).cmp(&text_of(b)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_params_without_order() {
        let query = Query::table("user_profiles").eq("id", 7);
        assert_eq!(
            query.to_params(),
            vec![("id".to_string(), "eq.7".to_string())]
        );
    }

    #[test]
    fn test_filter_matches_by_text_form() {
        let query = Query::table("t").eq("id", 7).eq("is_default", true);
        assert!(query.matches(&json!({ "id": 7, "is_default": true })));
        assert!(!query.matches(&json!({ "id": 8, "is_default": true })));
        assert!(!query.matches(&json!({ "is_default": true })));

        let query = Query::table("t").eq("user_id", "abc");
        assert!(query.matches(&json!({ "user_id": "abc" })));
    }

    #[test]
    fn test_compare_default_first_then_id() {
        let query = Query::table("user_addresses")
            .order("is_default", Direction::Desc)
            .order("id", Direction::Asc);

        let mut rows = vec![
            json!({ "id": 1, "is_default": false }),
            json!({ "id": 2, "is_default": true }),
            json!({ "id": 3, "is_default": false }),
        ];
        rows.sort_by(|a, b| query.compare(a, b));

        let ids: Vec<i64> = rows.iter().filter_map(|r| r["id"].as_i64()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_nulls_first_when_descending() {
        let query = Query::table("t").order("rank", Direction::Desc);
        assert_eq!(
            query.compare(&json!({ "rank": null }), &json!({ "rank": 5 })),
            Ordering::Less
        );

        let query = Query::table("t").order("rank", Direction::Asc);
        assert_eq!(
            query.compare(&json!({}), &json!({ "rank": 5 })),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_without_order_is_equal() {
        let query = Query::table("t");
        assert_eq!(
            query.compare(&json!({ "id": 1 }), &json!({ "id": 2 })),
            Ordering::Equal
        );
    }
}
