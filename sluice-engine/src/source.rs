//! Extraction sources
//!
//! A [`SourceConnector`] opens a connection for a single extract stage, runs
//! the stage's query and converts every row into a [`Record`]. Connections
//! are never shared between stages or runs.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde_json::{Number, Value};
use sluice_core::domain::dataset::Record;
use sqlx::postgres::{PgColumn, PgConnectOptions, PgConnection, PgRow};
use sqlx::{Column, Connection, Row, TypeInfo};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

use crate::params::DatabaseSource;

/// Errors raised while reading from a source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to connect to source: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("failed to decode column '{column}': {source}")]
    Decode {
        column: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("column '{column}' has unsupported type {type_name}")]
    UnsupportedType { column: String, type_name: String },

    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Reads rows from a database source
#[async_trait]
pub trait SourceConnector: Send + Sync {
    /// Runs the source query and returns one record per result row
    ///
    /// Columns keep the order of the query's result columns. On failure no
    /// rows are returned.
    async fn fetch(&self, source: &DatabaseSource) -> Result<Vec<Record>, SourceError>;
}

/// Postgres implementation of [`SourceConnector`]
///
/// Accepts both `postgres://` URLs and JDBC-style `jdbc:postgresql://` URLs.
#[derive(Debug, Clone, Default)]
pub struct PgSourceConnector;

impl PgSourceConnector {
    pub fn new() -> Self {
        Self
    }

    fn connect_options(source: &DatabaseSource) -> Result<PgConnectOptions, SourceError> {
        let url = source
            .db_url
            .strip_prefix("jdbc:")
            .unwrap_or(&source.db_url);

        let options = PgConnectOptions::from_str(url)
            .map_err(SourceError::Connect)?
            .username(&source.username)
            .password(&source.password);

        Ok(options)
    }
}

#[async_trait]
impl SourceConnector for PgSourceConnector {
    async fn fetch(&self, source: &DatabaseSource) -> Result<Vec<Record>, SourceError> {
        let options = Self::connect_options(source)?;
        let mut conn = PgConnection::connect_with(&options)
            .await
            .map_err(SourceError::Connect)?;

        debug!("Running extract query against {}", source.db_url);
        let rows = sqlx::query(source.query.as_str()).fetch_all(&mut conn).await;

        if let Err(e) = conn.close().await {
            warn!("Failed to close source connection: {}", e);
        }

        let rows = rows.map_err(SourceError::Query)?;
        rows.iter().map(row_to_record).collect()
    }
}

fn row_to_record(row: &PgRow) -> Result<Record, SourceError> {
    let mut record = Record::new();
    for column in row.columns() {
        record.insert(column.name().to_string(), decode_column(row, column)?);
    }
    Ok(record)
}

fn decode_column(row: &PgRow, column: &PgColumn) -> Result<Value, SourceError> {
    let idx = column.ordinal();
    let decode_err = |source: sqlx::Error| SourceError::Decode {
        column: column.name().to_string(),
        source,
    };

    let value = match column.type_info().name() {
        "BOOL" => row
            .try_get::<Option<bool>, _>(idx)
            .map_err(decode_err)?
            .map(Value::Bool),
        "INT2" => row
            .try_get::<Option<i16>, _>(idx)
            .map_err(decode_err)?
            .map(Value::from),
        "INT4" => row
            .try_get::<Option<i32>, _>(idx)
            .map_err(decode_err)?
            .map(Value::from),
        "INT8" => row
            .try_get::<Option<i64>, _>(idx)
            .map_err(decode_err)?
            .map(Value::from),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(idx)
            .map_err(decode_err)?
            .map(|v| float(f64::from(v))),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>(idx)
            .map_err(decode_err)?
            .map(float),
        "NUMERIC" => row
            .try_get::<Option<BigDecimal>, _>(idx)
            .map_err(decode_err)?
            .map(numeric),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CITEXT" => row
            .try_get::<Option<String>, _>(idx)
            .map_err(decode_err)?
            .map(Value::String),
        "UUID" => row
            .try_get::<Option<uuid::Uuid>, _>(idx)
            .map_err(decode_err)?
            .map(|v| Value::String(v.to_string())),
        "JSON" | "JSONB" => row
            .try_get::<Option<Value>, _>(idx)
            .map_err(decode_err)?,
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx)
            .map_err(decode_err)?
            .map(|v| Value::String(v.to_rfc3339())),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(idx)
            .map_err(decode_err)?
            .map(|v| Value::String(v.to_string())),
        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(idx)
            .map_err(decode_err)?
            .map(|v| Value::String(v.to_string())),
        "TIME" => row
            .try_get::<Option<chrono::NaiveTime>, _>(idx)
            .map_err(decode_err)?
            .map(|v| Value::String(v.to_string())),
        other => {
            return Err(SourceError::UnsupportedType {
                column: column.name().to_string(),
                type_name: other.to_string(),
            });
        }
    };

    Ok(value.unwrap_or(Value::Null))
}

// NaN and infinities have no JSON form
fn float(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

/// Exact-valued decimals become JSON numbers; the rest keep their digits as text
fn numeric(v: BigDecimal) -> Value {
    if v.is_integer() {
        if let Ok(n) = v.with_scale(0).to_string().parse::<i64>() {
            return Value::from(n);
        }
    }

    let exact = v
        .to_string()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .filter(|f| BigDecimal::from_str(&f.to_string()).is_ok_and(|back| back == v));

    match exact {
        Some(f) => float(f),
        None => Value::String(v.normalized().to_string()),
    }
}
