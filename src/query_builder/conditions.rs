use sqlx::{Postgres, QueryBuilder};

/// A query-string value after type coercion.
///
/// Raw parameters arrive as strings; `"true"`/`"false"` become booleans and
/// fully numeric strings become numbers so that they bind against the
/// column's native type.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl FilterValue {
    /// Coerce a raw query-string value.
    pub fn coerce(raw: &str) -> FilterValue {
        match raw {
            "true" => return FilterValue::Bool(true),
            "false" => return FilterValue::Bool(false),
            _ => {}
        }
        if let Ok(n) = raw.parse::<i64>() {
            return FilterValue::Int(n);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return FilterValue::Float(f);
        }
        FilterValue::Str(raw.to_string())
    }

    fn push_bind(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            FilterValue::Bool(b) => builder.push_bind(*b),
            FilterValue::Int(n) => builder.push_bind(*n),
            FilterValue::Float(f) => builder.push_bind(*f),
            FilterValue::Str(s) => builder.push_bind(s.clone()),
        };
    }
}

/// A WHERE-clause fragment. Column names are validated before a condition
/// is built; values are always bound, never rendered into the SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq {
        column: String,
        value: FilterValue,
    },
    /// Case-insensitive substring match (`ILIKE '%term%'`).
    ContainsInsensitive {
        column: String,
        term: String,
    },
    IsNull {
        column: String,
    },
    NotNull {
        column: String,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    /// AND-combine with another condition, flattening where possible.
    pub fn and(self, other: Condition) -> Condition {
        match self {
            Condition::And(mut parts) => {
                parts.push(other);
                Condition::And(parts)
            }
            first => Condition::And(vec![first, other]),
        }
    }

    /// Render onto a [`QueryBuilder`], binding every value.
    pub fn push_sql(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Condition::Eq { column, value } => {
                builder.push(column);
                builder.push(" = ");
                value.push_bind(builder);
            }
            Condition::ContainsInsensitive { column, term } => {
                builder.push(column);
                builder.push(" ILIKE ");
                builder.push_bind(format!("%{term}%"));
            }
            Condition::IsNull { column } => {
                builder.push(column);
                builder.push(" IS NULL");
            }
            Condition::NotNull { column } => {
                builder.push(column);
                builder.push(" IS NOT NULL");
            }
            Condition::And(parts) => Self::push_group(builder, parts, " AND "),
            Condition::Or(parts) => Self::push_group(builder, parts, " OR "),
        }
    }

    fn push_group(builder: &mut QueryBuilder<'_, Postgres>, parts: &[Condition], sep: &str) {
        if parts.is_empty() {
            // Empty groups must not break the surrounding clause.
            builder.push("TRUE");
            return;
        }
        builder.push("(");
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                builder.push(sep);
            }
            part.push_sql(builder);
        }
        builder.push(")");
    }
}

/// Convert a camelCase wire name to its snake_case column.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Map a wire parameter name to a safe column name, or `None` when the
/// snake_cased result is not a plain SQL identifier.
pub fn column_name(raw: &str) -> Option<String> {
    let column = to_snake_case(raw);
    let mut chars = column.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
        Some(column)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(condition: &Condition) -> String {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("");
        condition.push_sql(&mut builder);
        builder.sql().to_string()
    }

    #[test]
    fn test_coerce_booleans_and_numbers() {
        assert_eq!(FilterValue::coerce("true"), FilterValue::Bool(true));
        assert_eq!(FilterValue::coerce("false"), FilterValue::Bool(false));
        assert_eq!(FilterValue::coerce("42"), FilterValue::Int(42));
        assert_eq!(FilterValue::coerce("-7"), FilterValue::Int(-7));
        assert_eq!(FilterValue::coerce("3.5"), FilterValue::Float(3.5));
        assert_eq!(
            FilterValue::coerce("hello"),
            FilterValue::Str("hello".to_string())
        );
        // Partially numeric strings stay strings.
        assert_eq!(
            FilterValue::coerce("12abc"),
            FilterValue::Str("12abc".to_string())
        );
    }

    #[test]
    fn test_values_are_bound_not_inlined() {
        let condition = Condition::Eq {
            column: "status".to_string(),
            value: FilterValue::Str("pending'; DROP TABLE users; --".to_string()),
        };
        let sql = render(&condition);
        assert_eq!(sql, "status = $1");
        assert!(!sql.contains("DROP TABLE"));
    }

    #[test]
    fn test_ilike_binds_wrapped_term() {
        let condition = Condition::ContainsInsensitive {
            column: "title".to_string(),
            term: "mariage".to_string(),
        };
        assert_eq!(render(&condition), "title ILIKE $1");
    }

    #[test]
    fn test_groups_parenthesize_and_separate() {
        let condition = Condition::And(vec![
            Condition::Eq {
                column: "month".to_string(),
                value: FilterValue::Int(3),
            },
            Condition::Or(vec![
                Condition::ContainsInsensitive {
                    column: "title".to_string(),
                    term: "aide".to_string(),
                },
                Condition::ContainsInsensitive {
                    column: "description".to_string(),
                    term: "aide".to_string(),
                },
            ]),
        ]);
        assert_eq!(
            render(&condition),
            "(month = $1 AND (title ILIKE $2 OR description ILIKE $3))"
        );
    }

    #[test]
    fn test_empty_group_renders_true() {
        assert_eq!(render(&Condition::Or(vec![])), "TRUE");
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("amountRequested"), "amount_requested");
        assert_eq!(to_snake_case("userId"), "user_id");
        assert_eq!(to_snake_case("status"), "status");
    }

    #[test]
    fn test_column_name_rejects_hostile_input() {
        assert_eq!(column_name("userId"), Some("user_id".to_string()));
        assert_eq!(column_name("created_at"), Some("created_at".to_string()));
        assert_eq!(column_name("id; DROP TABLE users"), None);
        assert_eq!(column_name("1column"), None);
        assert_eq!(column_name(""), None);
        assert_eq!(column_name("col-name"), None);
    }
}
