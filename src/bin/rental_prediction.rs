//! Rental prediction demo
//!
//! Reproduces the classic ski-rental regression workflow end to end: an
//! embedded table registry stands in for the remote SQL Server, seeded with a
//! deterministic `dbo.rental_data` table; the pipeline imports it, splits
//! 80/20 with seed 1, fits OLS on everything except `Year`, and reports the
//! mean squared error of the held-out predictions.
//!
//! Run with: cargo run --bin rental_prediction

use anyhow::Result;
use arrow::array::{Int32Array, RecordBatch, StringArray};
use predecir::config::PipelineConfig;
use predecir::schema::TableSchema;
use predecir::sql::TableRegistry;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const CONN_STR: &str =
    "Driver=SQL Server;Server=MYSQLSERVER;Database=TutorialDB;Trusted_Connection=True;";

const TABLE: &str = "dbo.rental_data";

fn rental_schema() -> TableSchema {
    TableSchema::new()
        .with_integer("Year")
        .with_integer("Month")
        .with_integer("Day")
        .with_integer("RentalCount")
        .with_factor("WeekDay", ["1", "2", "3", "4", "5", "6", "7"])
        .with_factor("Holiday", ["1", "0"])
        .with_factor("Snow", ["1", "0"])
}

/// Deterministic stand-in for the tutorial's rental history table
fn seed_rental_data(registry: &mut TableRegistry) -> Result<usize> {
    let mut rng = StdRng::seed_from_u64(7);

    let mut years = Vec::new();
    let mut months = Vec::new();
    let mut days = Vec::new();
    let mut counts = Vec::new();
    let mut weekdays = Vec::new();
    let mut holidays = Vec::new();
    let mut snows = Vec::new();

    for year in 2013_i32..=2014 {
        for month in 1_i32..=12 {
            for day in 1_i32..=28 {
                let weekday = (year + month + day) % 7 + 1;
                let weekend = weekday >= 6;
                let holiday = day == 1 || (month == 12 && day == 25);
                let winter = month <= 2 || month == 12;
                let snow = winter && rng.gen_bool(0.4);

                let mut count = 80;
                if weekend {
                    count += 40;
                }
                if holiday {
                    count += 30;
                }
                if snow {
                    count += 60;
                }
                count += rng.gen_range(-15..=15);

                years.push(year);
                months.push(month);
                days.push(day);
                counts.push(count);
                weekdays.push(weekday.to_string());
                holidays.push(if holiday { "1" } else { "0" }.to_string());
                snows.push(if snow { "1" } else { "0" }.to_string());
            }
        }
    }

    let num_rows = years.len();
    let batch = RecordBatch::try_new(
        rental_schema().to_arrow(),
        vec![
            Arc::new(Int32Array::from(years)),
            Arc::new(Int32Array::from(months)),
            Arc::new(Int32Array::from(days)),
            Arc::new(Int32Array::from(counts)),
            Arc::new(StringArray::from(weekdays)),
            Arc::new(StringArray::from(holidays)),
            Arc::new(StringArray::from(snows)),
        ],
    )?;
    registry.register(TABLE, vec![batch])?;
    Ok(num_rows)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut registry = TableRegistry::new();
    let seeded = seed_rental_data(&mut registry)?;
    println!("Seeded embedded registry: {seeded} rows in {TABLE}");

    let config = PipelineConfig::new(CONN_STR, TABLE, rental_schema(), "RentalCount")
        .with_split_fraction(0.8)
        .with_seed(1)
        .exclude("Year");

    let report = predecir::pipeline::run(&config, &registry)?;

    println!("\n{report}\n");
    println!("Report JSON:\n{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
