//! Process Repository
//!
//! Processes and their stages. A process row and its stage rows are always
//! written together in one transaction.

use sluice_core::domain::process::{Process, ProcessStatus};
use sluice_core::domain::stage::{Stage, StageDescriptor};
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a process and its linked stages
pub async fn create(pool: &PgPool, process: &Process) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO etl_processes (id, description_id, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(process.id)
    .bind(process.description_id)
    .bind(process.status.as_str())
    .bind(process.created_at)
    .bind(process.updated_at)
    .execute(&mut *tx)
    .await?;

    for stage in &process.stages {
        sqlx::query(
            r#"
            INSERT INTO etl_stages (id, process_id, position, name, description)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(stage.id)
        .bind(stage.process_id)
        .bind(stage.position as i32)
        .bind(&stage.descriptor.name)
        .bind(&stage.descriptor.description)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

/// Find a process by ID, stages in declared order
///
/// Stage parameters are not stored and come back empty.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ProcessRecord>, sqlx::Error> {
    let Some(row) = sqlx::query_as::<_, ProcessRow>(
        r#"
        SELECT id, description_id, status, created_at, updated_at
        FROM etl_processes
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };

    let stages = sqlx::query_as::<_, StageRow>(
        r#"
        SELECT id, process_id, position, name, description
        FROM etl_stages
        WHERE process_id = $1
        ORDER BY position ASC
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(ProcessRecord { row, stages }))
}

/// Move a process between states if it is still in `from`
pub async fn transition(
    pool: &PgPool,
    id: Uuid,
    from: ProcessStatus,
    to: ProcessStatus,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE etl_processes
        SET status = $1, updated_at = $2
        WHERE id = $3 AND status = $4
        "#,
    )
    .bind(to.as_str())
    .bind(chrono::Utc::now())
    .bind(id)
    .bind(from.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

/// A process row with its stage rows, not yet validated
pub struct ProcessRecord {
    row: ProcessRow,
    stages: Vec<StageRow>,
}

#[derive(sqlx::FromRow)]
struct ProcessRow {
    id: Uuid,
    description_id: Uuid,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(sqlx::FromRow)]
struct StageRow {
    id: Uuid,
    process_id: Uuid,
    position: i32,
    name: String,
    description: Option<String>,
}

impl TryFrom<ProcessRecord> for Process {
    type Error = String;

    fn try_from(record: ProcessRecord) -> Result<Self, Self::Error> {
        let ProcessRecord { row, stages } = record;
        let status = row.status.parse::<ProcessStatus>().map_err(|e| e.to_string())?;

        let stages = stages
            .into_iter()
            .map(|stage| {
                let position = u32::try_from(stage.position)
                    .map_err(|_| format!("negative stage position {}", stage.position))?;
                Ok(Stage {
                    id: stage.id,
                    process_id: stage.process_id,
                    position,
                    descriptor: StageDescriptor {
                        name: stage.name,
                        description: stage.description,
                        parameters: Default::default(),
                    },
                })
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(Process {
            id: row.id,
            description_id: row.description_id,
            status,
            stages,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
