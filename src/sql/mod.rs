//! SQL front end for the import path
//!
//! The importer speaks a deliberately small SQL subset, the one shape it ever
//! issues:
//!
//! - SELECT with a plain column list or `*`
//! - FROM a single (optionally schema-qualified) table
//!
//! Everything else (JOINs, WHERE, GROUP BY, ORDER BY, LIMIT, expressions in
//! the projection) is rejected with a descriptive parse error rather than
//! silently ignored, so a typo in an import query surfaces immediately.
//!
//! References:
//! - sqlparser-rs: <https://docs.rs/sqlparser>

pub mod registry;

pub use registry::{SqlExecutor, TableRegistry};

use crate::{Error, Result};
use sqlparser::ast::{Expr, GroupByExpr, Query, Select, SelectItem, SetExpr, Statement};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

/// Parsed import query: a projection over a single table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    /// Selected columns (`*` selects all, in table order)
    pub columns: Vec<String>,
    /// Fully-qualified table name as written (`dbo.rental_data`)
    pub table: String,
}

impl QueryPlan {
    /// Whether the projection selects every column
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.columns.iter().any(|c| c == "*")
    }
}

/// Query parser
pub struct QueryEngine {
    dialect: GenericDialect,
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryEngine {
    /// Create a new query engine
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dialect: GenericDialect {},
        }
    }

    /// Parse an import query into a [`QueryPlan`]
    ///
    /// # Errors
    /// Returns [`Error::Parse`] if:
    /// - SQL syntax is invalid
    /// - the query uses features outside the import subset
    /// - multiple statements are provided
    ///
    /// # Example
    /// ```
    /// use predecir::sql::QueryEngine;
    ///
    /// let engine = QueryEngine::new();
    /// let plan = engine.parse("SELECT * FROM dbo.rental_data")?;
    /// assert_eq!(plan.table, "dbo.rental_data");
    /// assert!(plan.is_wildcard());
    /// # Ok::<(), predecir::Error>(())
    /// ```
    pub fn parse(&self, sql: &str) -> Result<QueryPlan> {
        let statements = Parser::parse_sql(&self.dialect, sql)
            .map_err(|e| Error::Parse(format!("{e}")))?;

        if statements.len() != 1 {
            return Err(Error::Parse(
                "only single statements supported".to_string(),
            ));
        }

        let stmt = &statements[0];
        let Statement::Query(query) = stmt else {
            return Err(Error::Parse(
                "only SELECT queries supported".to_string(),
            ));
        };

        Self::parse_select_query(query)
    }

    fn parse_select_query(query: &Query) -> Result<QueryPlan> {
        let SetExpr::Select(select) = query.body.as_ref() else {
            return Err(Error::Parse(
                "only SELECT queries supported".to_string(),
            ));
        };

        if query.order_by.is_some() {
            return Err(Error::Parse(
                "ORDER BY not supported in import queries".to_string(),
            ));
        }
        if query.limit.is_some() {
            return Err(Error::Parse(
                "LIMIT not supported in import queries".to_string(),
            ));
        }
        if select.selection.is_some() {
            return Err(Error::Parse(
                "WHERE not supported in import queries".to_string(),
            ));
        }
        let has_group_by = match &select.group_by {
            GroupByExpr::All(_) => true,
            GroupByExpr::Expressions(exprs, modifiers) => {
                !exprs.is_empty() || !modifiers.is_empty()
            }
        };
        if has_group_by {
            return Err(Error::Parse(
                "GROUP BY not supported in import queries".to_string(),
            ));
        }

        let table = Self::extract_table_name(select)?;
        let columns = Self::extract_columns(&select.projection)?;

        Ok(QueryPlan { columns, table })
    }

    fn extract_table_name(select: &Select) -> Result<String> {
        if select.from.is_empty() {
            return Err(Error::Parse(
                "import query requires a FROM clause".to_string(),
            ));
        }
        if select.from.len() > 1 {
            return Err(Error::Parse(
                "multiple tables not supported".to_string(),
            ));
        }

        let table_with_joins = &select.from[0];
        if !table_with_joins.joins.is_empty() {
            return Err(Error::Parse("JOINs not supported".to_string()));
        }

        Ok(table_with_joins.relation.to_string())
    }

    fn extract_columns(projection: &[SelectItem]) -> Result<Vec<String>> {
        let mut columns = Vec::new();

        for item in projection {
            match item {
                SelectItem::Wildcard(_) => columns.push("*".to_string()),
                SelectItem::UnnamedExpr(expr) => match expr {
                    Expr::Identifier(ident) => columns.push(ident.value.clone()),
                    Expr::CompoundIdentifier(_) => columns.push(expr.to_string()),
                    other => {
                        return Err(Error::Parse(format!(
                            "unsupported projection expression '{other}': \
                             import queries select plain columns only"
                        )))
                    }
                },
                SelectItem::ExprWithAlias { expr, .. } => {
                    return Err(Error::Parse(format!(
                        "aliased projection '{expr}' not supported in import queries"
                    )))
                }
                SelectItem::QualifiedWildcard(..) => {
                    return Err(Error::Parse(
                        "qualified wildcards not supported".to_string(),
                    ))
                }
            }
        }

        if columns.is_empty() {
            return Err(Error::Parse("empty projection".to_string()));
        }

        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wildcard() {
        let plan = QueryEngine::new().parse("SELECT * FROM dbo.rental_data").unwrap();
        assert_eq!(plan.table, "dbo.rental_data");
        assert!(plan.is_wildcard());
    }

    #[test]
    fn test_parse_column_list() {
        let plan = QueryEngine::new()
            .parse("SELECT Day, Month, RentalCount FROM rental_data")
            .unwrap();
        assert_eq!(plan.columns, vec!["Day", "Month", "RentalCount"]);
        assert!(!plan.is_wildcard());
    }

    #[test]
    fn test_parse_rejects_invalid_sql() {
        assert!(QueryEngine::new().parse("SELEKT * FROM t").is_err());
    }

    #[test]
    fn test_parse_rejects_multiple_statements() {
        let err = QueryEngine::new()
            .parse("SELECT * FROM a; SELECT * FROM b")
            .unwrap_err();
        assert!(err.to_string().contains("single statements"));
    }

    #[test]
    fn test_parse_rejects_non_select() {
        let err = QueryEngine::new().parse("DELETE FROM t").unwrap_err();
        assert!(err.to_string().contains("SELECT"));
    }

    #[test]
    fn test_parse_rejects_join() {
        let err = QueryEngine::new()
            .parse("SELECT * FROM a JOIN b ON a.id = b.id")
            .unwrap_err();
        assert!(err.to_string().contains("JOIN"));
    }

    #[test]
    fn test_parse_rejects_where() {
        let err = QueryEngine::new()
            .parse("SELECT * FROM t WHERE x > 1")
            .unwrap_err();
        assert!(err.to_string().contains("WHERE"));
    }

    #[test]
    fn test_parse_rejects_aggregation() {
        let err = QueryEngine::new()
            .parse("SELECT SUM(x) FROM t")
            .unwrap_err();
        assert!(err.to_string().contains("plain columns"));
    }

    #[test]
    fn test_parse_rejects_order_by_and_limit() {
        assert!(QueryEngine::new()
            .parse("SELECT * FROM t ORDER BY x")
            .is_err());
        assert!(QueryEngine::new().parse("SELECT * FROM t LIMIT 5").is_err());
    }

    #[test]
    fn test_parse_rejects_missing_from() {
        let err = QueryEngine::new().parse("SELECT 1").unwrap_err();
        assert!(err.to_string().contains("FROM"));
    }
}
