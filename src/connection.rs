//! Connection string parsing
//!
//! Data sources are addressed with ODBC-style connection strings
//! (`Driver=SQL Server;Server=MYSQLSERVER;Database=TutorialDB;Trusted_Connection=True;`).
//! The string is parsed up front so a malformed address fails before any import
//! work starts, and so credentials never leak through `Display`.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Parsed ODBC-style connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    driver: String,
    server: String,
    database: String,
    trusted_connection: bool,
    /// Additional `key=value` pairs, preserved in input order
    extras: Vec<(String, String)>,
}

impl ConnectionString {
    /// Parse a connection string
    ///
    /// Required keys: `Driver`, `Server`, `Database`. Keys are
    /// case-insensitive; `Trusted_Connection` accepts `True`/`False`/`Yes`/`No`.
    /// Unrecognized keys are preserved as extras.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] for empty input, fragments without `=`,
    /// or a missing required key.
    ///
    /// # Example
    /// ```
    /// use predecir::connection::ConnectionString;
    ///
    /// let conn = ConnectionString::parse(
    ///     "Driver=SQL Server;Server=MYSQLSERVER;Database=TutorialDB;Trusted_Connection=True;",
    /// )?;
    /// assert_eq!(conn.server(), "MYSQLSERVER");
    /// assert!(conn.trusted_connection());
    /// # Ok::<(), predecir::Error>(())
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Err(Error::Connection(
                "connection string is empty".to_string(),
            ));
        }

        let mut driver = None;
        let mut server = None;
        let mut database = None;
        let mut trusted_connection = false;
        let mut extras = Vec::new();

        for fragment in input.split(';') {
            let fragment = fragment.trim();
            if fragment.is_empty() {
                continue;
            }
            let Some((key, value)) = fragment.split_once('=') else {
                return Err(Error::Connection(format!(
                    "malformed fragment '{fragment}': expected key=value"
                )));
            };
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() {
                return Err(Error::Connection(format!(
                    "malformed fragment '{fragment}': empty key"
                )));
            }

            match key.to_ascii_lowercase().as_str() {
                "driver" => driver = Some(value.to_string()),
                "server" => server = Some(value.to_string()),
                "database" => database = Some(value.to_string()),
                "trusted_connection" => {
                    trusted_connection = match value.to_ascii_lowercase().as_str() {
                        "true" | "yes" => true,
                        "false" | "no" => false,
                        other => {
                            return Err(Error::Connection(format!(
                                "Trusted_Connection must be True/False, got '{other}'"
                            )))
                        }
                    };
                }
                _ => extras.push((key.to_string(), value.to_string())),
            }
        }

        let require = |field: Option<String>, name: &str| {
            field.ok_or_else(|| {
                Error::Connection(format!("missing required key '{name}'"))
            })
        };

        Ok(Self {
            driver: require(driver, "Driver")?,
            server: require(server, "Server")?,
            database: require(database, "Database")?,
            trusted_connection,
            extras,
        })
    }

    /// Declared driver name
    #[must_use]
    pub fn driver(&self) -> &str {
        &self.driver
    }

    /// Target server
    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Target database
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Whether integrated authentication was requested
    #[must_use]
    pub const fn trusted_connection(&self) -> bool {
        self.trusted_connection
    }

    /// Extra `key=value` pairs beyond the recognized set
    #[must_use]
    pub fn extras(&self) -> &[(String, String)] {
        &self.extras
    }
}

impl FromStr for ConnectionString {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ConnectionString {
    /// Round-trips the recognized keys; credential-like extras (`Pwd`,
    /// `Password`) are redacted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Driver={};Server={};Database={};Trusted_Connection={}",
            self.driver,
            self.server,
            self.database,
            if self.trusted_connection { "True" } else { "False" }
        )?;
        for (key, value) in &self.extras {
            if key.eq_ignore_ascii_case("pwd") || key.eq_ignore_ascii_case("password") {
                write!(f, ";{key}=***")?;
            } else {
                write!(f, ";{key}={value}")?;
            }
        }
        Ok(())
    }
}
