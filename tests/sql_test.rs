//! Integration tests for the SQL front end and the embedded table registry
//!
//! Covers the registry round trip (register → parse → execute) and Parquet
//! table loading: write a fixture with `ArrowWriter`, load it back, and run
//! the whole pipeline on top of it.

use arrow::array::{Int32Array, RecordBatch, StringArray};
use parquet::arrow::ArrowWriter;
use predecir::config::PipelineConfig;
use predecir::schema::TableSchema;
use predecir::sql::{QueryEngine, SqlExecutor, TableRegistry};
use predecir::pipeline;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

const CONN_STR: &str =
    "Driver=SQL Server;Server=LOCAL;Database=TutorialDB;Trusted_Connection=True;";

fn rental_schema() -> TableSchema {
    TableSchema::new()
        .with_integer("Day")
        .with_integer("RentalCount")
        .with_factor("Snow", ["1", "0"])
}

fn rental_batch(num_rows: i32) -> RecordBatch {
    let days: Vec<i32> = (1..=num_rows).collect();
    let counts: Vec<i32> = days.iter().map(|d| d * 10 + 5).collect();
    let snows: Vec<&str> = days.iter().map(|d| if d % 3 == 0 { "1" } else { "0" }).collect();
    RecordBatch::try_new(
        rental_schema().to_arrow(),
        vec![
            Arc::new(Int32Array::from(days)),
            Arc::new(Int32Array::from(counts)),
            Arc::new(StringArray::from(snows)),
        ],
    )
    .unwrap()
}

fn fixture_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("predecir_{}_{name}.parquet", std::process::id()))
}

fn write_parquet_fixture(path: &PathBuf, batch: &RecordBatch) {
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    writer.write(batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn test_registry_round_trip() {
    let mut registry = TableRegistry::new();
    registry
        .register("dbo.rental_data", vec![rental_batch(6)])
        .unwrap();

    let plan = QueryEngine::new()
        .parse("SELECT Day, RentalCount FROM dbo.rental_data")
        .unwrap();
    let batches = registry.execute(&plan).unwrap();

    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].num_rows(), 6);
    assert_eq!(batches[0].num_columns(), 2);
    assert_eq!(batches[0].schema().field(0).name(), "Day");
}

#[test]
fn test_load_parquet_table() {
    let path = fixture_path("load");
    write_parquet_fixture(&path, &rental_batch(100));

    let mut registry = TableRegistry::new();
    registry.load_parquet("rental_history", &path).unwrap();

    let plan = QueryEngine::new().parse("SELECT * FROM rental_history").unwrap();
    let batches = registry.execute(&plan).unwrap();
    let total_rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
    assert_eq!(total_rows, 100);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_parquet_missing_file() {
    let mut registry = TableRegistry::new();
    let err = registry
        .load_parquet("t", "/nonexistent/predecir.parquet")
        .unwrap_err();
    assert!(err.to_string().contains("failed to open"));
}

#[test]
fn test_pipeline_over_parquet_backed_table() {
    let path = fixture_path("pipeline");
    write_parquet_fixture(&path, &rental_batch(40));

    let mut registry = TableRegistry::new();
    registry.load_parquet("dbo.rental_data", &path).unwrap();

    let config = PipelineConfig::new(CONN_STR, "dbo.rental_data", rental_schema(), "RentalCount")
        .with_split_fraction(0.8)
        .with_seed(1);
    let report = pipeline::run(&config, &registry).unwrap();

    assert_eq!(report.imported_rows, 40);
    assert_eq!(report.train_shape.0 + report.test_shape.0, 40);
    assert!(report.mean_squared_error.is_finite());

    std::fs::remove_file(&path).ok();
}
