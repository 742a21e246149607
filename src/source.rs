//! Data source connectors
//!
//! A [`DataSource`] yields the full row set of one table as a materialized
//! [`DataFrame`]. The shipped connector, [`SqlTableSource`], is addressed by a
//! connection string, a fully-qualified table name, and a declared column
//! schema; it issues `SELECT * FROM <table>` through a [`SqlExecutor`] and
//! validates whatever comes back before handing it on. Failures are not caught
//! here. Connection, query, and schema errors propagate to the caller.

use crate::connection::ConnectionString;
use crate::frame::DataFrame;
use crate::schema::TableSchema;
use crate::sql::{QueryEngine, SqlExecutor};
use crate::Result;
use tracing::debug;

/// Yields the full row set of a table as a tabular dataset
pub trait DataSource {
    /// Execute the import and materialize the frame
    ///
    /// # Errors
    /// Propagates connection, query, and schema validation failures.
    fn import(&self) -> Result<DataFrame>;
}

/// SQL table source: connection string, table name, declared schema
pub struct SqlTableSource<'a> {
    connection: ConnectionString,
    table: String,
    schema: TableSchema,
    executor: &'a dyn SqlExecutor,
}

impl<'a> std::fmt::Debug for SqlTableSource<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlTableSource")
            .field("connection", &self.connection)
            .field("table", &self.table)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl<'a> SqlTableSource<'a> {
    /// Create a source for one remote table
    ///
    /// The connection string is parsed eagerly so a malformed address fails
    /// here, before any query is issued.
    ///
    /// # Errors
    /// Returns [`crate::Error::Connection`] for a malformed connection string.
    pub fn new(
        connection: &str,
        table: impl Into<String>,
        schema: TableSchema,
        executor: &'a dyn SqlExecutor,
    ) -> Result<Self> {
        Ok(Self {
            connection: ConnectionString::parse(connection)?,
            table: table.into(),
            schema,
            executor,
        })
    }

    /// Parsed connection string
    #[must_use]
    pub const fn connection(&self) -> &ConnectionString {
        &self.connection
    }

    /// Fully-qualified source table name
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Declared column schema
    #[must_use]
    pub const fn schema(&self) -> &TableSchema {
        &self.schema
    }

    fn import_query(&self) -> String {
        format!("SELECT * FROM {}", self.table)
    }
}

impl DataSource for SqlTableSource<'_> {
    fn import(&self) -> Result<DataFrame> {
        let sql = self.import_query();
        debug!(query = %sql, server = %self.connection.server(), "issuing import query");

        // Parsing the built query also validates the table identifier
        let plan = QueryEngine::new().parse(&sql)?;
        let batches = self.executor.execute(&plan)?;
        DataFrame::new(self.schema.clone(), batches)
    }
}
