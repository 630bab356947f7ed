//! Description Repository

use sluice_core::domain::description::Description;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn insert(pool: &PgPool, description: &Description) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO etl_descriptions (id, description, created_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(description.id)
    .bind(&description.text)
    .bind(description.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Description>, sqlx::Error> {
    let row = sqlx::query_as::<_, DescriptionRow>(
        r#"
        SELECT id, description, created_at
        FROM etl_descriptions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

#[derive(sqlx::FromRow)]
struct DescriptionRow {
    id: Uuid,
    description: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<DescriptionRow> for Description {
    fn from(row: DescriptionRow) -> Self {
        Description {
            id: row.id,
            text: row.description,
            created_at: row.created_at,
        }
    }
}
