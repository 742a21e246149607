//! # Predecir: SQL-to-Model Linear Regression Pipeline
//!
//! Predecir pulls tabular rows out of a SQL data source into Arrow columnar
//! memory, splits them into reproducible train/test subsets, fits an ordinary
//! least squares model, and reports prediction error. One unit of work,
//! executed top to bottom, single-threaded and synchronous.
//!
//! ## Design Principles
//!
//! - **Fail at the boundary**: column typing is declared up front and every
//!   imported batch is validated against it, so bad remote data never reaches
//!   the model fit
//! - **Reproducibility**: splits are seeded; the same seed and dataset
//!   ordering always yield the same partition and the same error metric
//! - **Explicit encoding**: factor columns one-hot encode from their declared
//!   level order, never from data order
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use predecir::config::PipelineConfig;
//! use predecir::schema::TableSchema;
//! use predecir::sql::TableRegistry;
//!
//! let schema = TableSchema::new()
//!     .with_integer("Day")
//!     .with_integer("RentalCount")
//!     .with_factor("Holiday", ["1", "0"]);
//!
//! let config = PipelineConfig::new(
//!     "Driver=SQL Server;Server=MYSQLSERVER;Database=TutorialDB;Trusted_Connection=True;",
//!     "dbo.rental_data",
//!     schema,
//!     "RentalCount",
//! );
//!
//! let registry = TableRegistry::new(); // stands in for the remote server
//! let report = predecir::pipeline::run(&config, &registry)?;
//! println!("{report}");
//! # Ok::<(), predecir::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod connection;
pub mod error;
pub mod frame;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod schema;
pub mod source;
pub mod split;
pub mod sql;

pub use error::{Error, Result};
