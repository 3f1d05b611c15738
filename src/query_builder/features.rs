use std::collections::HashMap;

use sqlx::{Postgres, QueryBuilder};

use super::conditions::{column_name, Condition, FilterValue};

/// Query-string keys consumed by the builder itself; never treated as
/// column filters.
const RESERVED_KEYS: &[&str] = &["page", "limit", "sortBy", "sortOrder", "fields", "search"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Chainable list-query builder over the raw query-parameter map.
///
/// Stages may be invoked in any order; [`build`](ApiFeatures::build) always
/// merges them in the fixed semantic order filter → search → sort →
/// paginate. Unknown or malformed input is dropped silently; the builder
/// never errors.
#[derive(Debug, Clone)]
pub struct ApiFeatures {
    params: HashMap<String, String>,
    default_limit: i64,
    filter: Option<Condition>,
    search: Option<Condition>,
    order_by: Option<(String, SortDirection)>,
    skip: Option<i64>,
    take: Option<i64>,
}

impl ApiFeatures {
    pub fn new(params: HashMap<String, String>, default_limit: i64) -> Self {
        Self {
            params,
            default_limit,
            filter: None,
            search: None,
            order_by: None,
            skip: None,
            take: None,
        }
    }

    /// Equality filters from every non-reserved parameter whose name maps
    /// to a valid column. Values are type-coerced; names that do not
    /// survive the identifier check are dropped.
    pub fn filter(mut self) -> Self {
        let mut keys: Vec<&String> = self
            .params
            .keys()
            .filter(|key| !RESERVED_KEYS.contains(&key.as_str()))
            .collect();
        // Deterministic SQL regardless of map iteration order.
        keys.sort();

        let mut conditions = Vec::new();
        for key in keys {
            let Some(column) = column_name(key) else {
                continue;
            };
            let value = FilterValue::coerce(&self.params[key]);
            conditions.push(Condition::Eq { column, value });
        }

        self.filter = match conditions.len() {
            0 => None,
            1 => conditions.pop(),
            _ => Some(Condition::And(conditions)),
        };
        self
    }

    /// Case-insensitive contains over the allow-listed fields, OR-combined.
    /// No-op when `search` is absent or the allow-list is empty.
    pub fn search(mut self, allowed_fields: &[&str]) -> Self {
        let Some(term) = self.params.get("search") else {
            return self;
        };
        if term.is_empty() || allowed_fields.is_empty() {
            return self;
        }

        let branches: Vec<Condition> = allowed_fields
            .iter()
            .filter_map(|field| column_name(field))
            .map(|column| Condition::ContainsInsensitive {
                column,
                term: term.clone(),
            })
            .collect();

        if !branches.is_empty() {
            self.search = Some(Condition::Or(branches));
        }
        self
    }

    /// Ordering from `sortBy`/`sortOrder`. Only allow-listed fields take
    /// effect; a `desc` token sorts descending, anything else ascending.
    pub fn sort(mut self, allowed_fields: &[&str]) -> Self {
        let Some(sort_by) = self.params.get("sortBy") else {
            return self;
        };
        if !allowed_fields.contains(&sort_by.as_str()) {
            return self;
        }
        let Some(column) = column_name(sort_by) else {
            return self;
        };

        let direction = match self.params.get("sortOrder") {
            Some(order) if order.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        self.order_by = Some((column, direction));
        self
    }

    /// LIMIT/OFFSET from `page` and `limit`. Unparseable values fall back
    /// to the defaults silently; `page` is clamped to 1.
    pub fn paginate(mut self) -> Self {
        let page = self
            .params
            .get("page")
            .and_then(|raw| raw.parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = self
            .params
            .get("limit")
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(self.default_limit);

        self.skip = Some((page - 1) * limit);
        self.take = Some(limit);
        self
    }

    pub fn build(self) -> ListQuery {
        let condition = match (self.filter, self.search) {
            (Some(filter), Some(search)) => Some(filter.and(search)),
            (Some(filter), None) => Some(filter),
            (None, Some(search)) => Some(search),
            (None, None) => None,
        };
        ListQuery {
            condition,
            order_by: self.order_by,
            skip: self.skip,
            take: self.take,
        }
    }
}

/// The assembled list query: a condition tree plus ordering and paging,
/// ready to render onto a [`QueryBuilder`] with bound values.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub condition: Option<Condition>,
    pub order_by: Option<(String, SortDirection)>,
    pub skip: Option<i64>,
    pub take: Option<i64>,
}

impl ListQuery {
    /// AND-merge a handler-supplied condition (ownership scoping).
    pub fn and_where(mut self, extra: Condition) -> Self {
        self.condition = Some(match self.condition {
            Some(existing) => existing.and(extra),
            None => extra,
        });
        self
    }

    /// Push the WHERE clause, if any. Used alone for COUNT queries.
    pub fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        if let Some(condition) = &self.condition {
            builder.push(" WHERE ");
            condition.push_sql(builder);
        }
    }

    /// Push WHERE, ORDER BY and LIMIT/OFFSET onto a SELECT under
    /// construction.
    pub fn apply(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        self.push_where(builder);
        if let Some((column, direction)) = &self.order_by {
            builder.push(" ORDER BY ");
            builder.push(column);
            builder.push(match direction {
                SortDirection::Asc => " ASC",
                SortDirection::Desc => " DESC",
            });
        }
        if let Some(take) = self.take {
            builder.push(" LIMIT ");
            builder.push_bind(take);
        }
        if let Some(skip) = self.skip {
            builder.push(" OFFSET ");
            builder.push_bind(skip);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn render(query: &ListQuery) -> String {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT * FROM t");
        query.apply(&mut builder);
        builder.sql().to_string()
    }

    #[test]
    fn test_reserved_keys_never_become_filters() {
        let query = ApiFeatures::new(
            params(&[
                ("page", "2"),
                ("limit", "5"),
                ("sortBy", "id"),
                ("sortOrder", "desc"),
                ("fields", "id,title"),
                ("search", "x"),
                ("status", "pending"),
            ]),
            10,
        )
        .filter()
        .build();

        assert_eq!(
            query.condition,
            Some(Condition::Eq {
                column: "status".to_string(),
                value: FilterValue::Str("pending".to_string()),
            })
        );
    }

    #[test]
    fn test_filter_coerces_and_converts_names() {
        let query = ApiFeatures::new(params(&[("userId", "7"), ("resolved", "true")]), 10)
            .filter()
            .build();

        assert_eq!(
            query.condition,
            Some(Condition::And(vec![
                Condition::Eq {
                    column: "resolved".to_string(),
                    value: FilterValue::Bool(true),
                },
                Condition::Eq {
                    column: "user_id".to_string(),
                    value: FilterValue::Int(7),
                },
            ]))
        );
    }

    #[test]
    fn test_hostile_parameter_names_are_dropped() {
        let query = ApiFeatures::new(
            params(&[("id; DROP TABLE users", "1"), ("status", "pending")]),
            10,
        )
        .filter()
        .build();

        let sql = render(&query);
        assert_eq!(sql, "SELECT * FROM t WHERE status = $1");
    }

    #[test]
    fn test_search_or_group_anded_with_filter() {
        let query = ApiFeatures::new(params(&[("status", "pending"), ("search", "aide")]), 10)
            .filter()
            .search(&["title", "description"])
            .build();

        let sql = render(&query);
        assert_eq!(
            sql,
            "SELECT * FROM t WHERE (status = $1 AND (title ILIKE $2 OR description ILIKE $3))"
        );
    }

    #[test]
    fn test_search_is_noop_without_term_or_allowlist() {
        let no_term = ApiFeatures::new(params(&[]), 10)
            .search(&["title"])
            .build();
        assert!(no_term.condition.is_none());

        let no_allowlist = ApiFeatures::new(params(&[("search", "x")]), 10)
            .search(&[])
            .build();
        assert!(no_allowlist.condition.is_none());
    }

    #[test]
    fn test_sort_honors_allowlist_and_direction() {
        let allowed = ["id", "amountRequested", "createdAt"];

        let query = ApiFeatures::new(
            params(&[("sortBy", "amountRequested"), ("sortOrder", "DESC")]),
            10,
        )
        .sort(&allowed)
        .build();
        assert_eq!(
            query.order_by,
            Some(("amount_requested".to_string(), SortDirection::Desc))
        );

        let not_allowed = ApiFeatures::new(params(&[("sortBy", "password_hash")]), 10)
            .sort(&allowed)
            .build();
        assert!(not_allowed.order_by.is_none());

        let default_asc = ApiFeatures::new(params(&[("sortBy", "id"), ("sortOrder", "up")]), 10)
            .sort(&allowed)
            .build();
        assert_eq!(default_asc.order_by, Some(("id".to_string(), SortDirection::Asc)));
    }

    #[test]
    fn test_pagination_defaults_and_fallbacks() {
        let query = ApiFeatures::new(params(&[("page", "3"), ("limit", "20")]), 10)
            .paginate()
            .build();
        assert_eq!(query.skip, Some(40));
        assert_eq!(query.take, Some(20));

        let fallback = ApiFeatures::new(params(&[("page", "abc"), ("limit", "-5")]), 10)
            .paginate()
            .build();
        assert_eq!(fallback.skip, Some(0));
        assert_eq!(fallback.take, Some(10));

        let clamped = ApiFeatures::new(params(&[("page", "0")]), 10).paginate().build();
        assert_eq!(clamped.skip, Some(0));
    }

    #[test]
    fn test_stage_order_does_not_matter() {
        let raw = params(&[("status", "pending"), ("search", "aide"), ("page", "2")]);

        let forward = ApiFeatures::new(raw.clone(), 10)
            .filter()
            .search(&["title"])
            .paginate()
            .build();
        let backward = ApiFeatures::new(raw, 10)
            .paginate()
            .search(&["title"])
            .filter()
            .build();

        assert_eq!(render(&forward), render(&backward));
    }

    #[test]
    fn test_scoping_condition_merges_into_where() {
        let query = ApiFeatures::new(params(&[("status", "pending")]), 10)
            .filter()
            .build()
            .and_where(Condition::Eq {
                column: "user_id".to_string(),
                value: FilterValue::Int(42),
            });

        assert_eq!(
            render(&query),
            "SELECT * FROM t WHERE (status = $1 AND user_id = $2)"
        );
    }

    #[test]
    fn test_count_query_uses_where_only() {
        let query = ApiFeatures::new(params(&[("status", "pending"), ("page", "2")]), 10)
            .filter()
            .paginate()
            .build();

        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM t");
        query.push_where(&mut builder);
        assert_eq!(builder.sql(), "SELECT COUNT(*) FROM t WHERE status = $1");
    }
}
