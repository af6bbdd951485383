//! Postgres-backed menu repository.
//!
//! Expects two tenant-keyed tables:
//!
//! | Table | Key | Columns |
//! |-------|-----|---------|
//! | `menus` | `(tenant_id, menu_id)` | `name`, `display_name`, `url`, `parent_id`, `sequence`, `is_active` |
//! | `menu_rights` | `(tenant_id, rights_id)`, unique `(tenant_id, user_id, menu_id)` | `is_show` .. `is_verify`, `is_active`, `valid_from`, `valid_to`, `day_start`, `day_end`, `past_record_days`, `remarks` |
//!
//! `rights_id` is assigned by the database on insert. A bulk rights update runs
//! in one transaction; any failing row rolls the whole batch back.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;

use transerp_auth::{MenuNode, MenuRepository, MenuRight, Permissions, RepositoryError};
use transerp_core::{MenuId, RightsId, TenantId, UserId};

#[derive(Debug, Clone)]
pub struct PostgresMenuRepository {
    pool: Arc<PgPool>,
}

impl PostgresMenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    async fn load_menus(
        &self,
        tenant_id: TenantId,
        active_only: bool,
    ) -> Result<Vec<MenuNode>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT menu_id, name, display_name, url, parent_id, sequence, is_active
            FROM menus
            WHERE tenant_id = $1 AND ($2 = FALSE OR is_active)
            ORDER BY sequence, menu_id
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(active_only)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_menus", e))?;

        rows.iter()
            .map(menu_from_row)
            .collect::<Result<_, _>>()
            .map_err(|e| map_sqlx_error("decode_menu", e))
    }

    async fn load_rights(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        active_only: bool,
    ) -> Result<Vec<MenuRight>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                rights_id, user_id, menu_id,
                is_show, is_add, is_edit, is_delete, is_print, is_export, is_verify,
                is_active, valid_from, valid_to, day_start, day_end,
                past_record_days, remarks
            FROM menu_rights
            WHERE tenant_id = $1 AND user_id = $2 AND ($3 = FALSE OR is_active)
            ORDER BY menu_id
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(user_id.get())
        .bind(active_only)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_rights", e))?;

        rows.iter()
            .map(right_from_row)
            .collect::<Result<_, _>>()
            .map_err(|e| map_sqlx_error("decode_right", e))
    }
}

#[async_trait::async_trait]
impl MenuRepository for PostgresMenuRepository {
    #[instrument(skip(self), fields(tenant_id = %tenant_id.as_uuid()), err)]
    async fn all_menus(&self, tenant_id: TenantId) -> Result<Vec<MenuNode>, RepositoryError> {
        self.load_menus(tenant_id, false).await
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id.as_uuid()), err)]
    async fn active_menus(&self, tenant_id: TenantId) -> Result<Vec<MenuNode>, RepositoryError> {
        self.load_menus(tenant_id, true).await
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id.as_uuid(), user_id = %user_id), err)]
    async fn user_rights(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> Result<Vec<MenuRight>, RepositoryError> {
        self.load_rights(tenant_id, user_id, true).await
    }

    #[instrument(skip(self), fields(tenant_id = %tenant_id.as_uuid(), user_id = %user_id), err)]
    async fn all_user_rights(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
    ) -> Result<Vec<MenuRight>, RepositoryError> {
        self.load_rights(tenant_id, user_id, false).await
    }

    #[instrument(skip(self, rights), fields(tenant_id = %tenant_id.as_uuid(), rows = rights.len()), err)]
    async fn save_user_rights(
        &self,
        tenant_id: TenantId,
        rights: Vec<MenuRight>,
    ) -> Result<Vec<MenuRight>, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let mut saved = Vec::with_capacity(rights.len());
        for mut right in rights {
            let outcome = if right.id.is_unsaved() {
                insert_right(&mut tx, tenant_id, &right).await.map(|id| {
                    right.id = id;
                })
            } else {
                update_right(&mut tx, tenant_id, &right).await
            };

            if let Err(err) = outcome {
                tx.rollback()
                    .await
                    .map_err(|e| map_sqlx_error("rollback", e))?;
                return Err(err);
            }
            saved.push(right);
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(saved)
    }
}

async fn insert_right(
    tx: &mut Transaction<'_, Postgres>,
    tenant_id: TenantId,
    right: &MenuRight,
) -> Result<RightsId, RepositoryError> {
    let p = right.permissions;
    let row = sqlx::query(
        r#"
        INSERT INTO menu_rights (
            tenant_id, user_id, menu_id,
            is_show, is_add, is_edit, is_delete, is_print, is_export, is_verify,
            is_active, valid_from, valid_to, day_start, day_end,
            past_record_days, remarks
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        RETURNING rights_id
        "#,
    )
    .bind(tenant_id.as_uuid())
    .bind(right.user_id.get())
    .bind(right.menu_id.get())
    .bind(p.show)
    .bind(p.add)
    .bind(p.edit)
    .bind(p.delete)
    .bind(p.print)
    .bind(p.export)
    .bind(p.verify)
    .bind(right.active)
    .bind(right.valid_from)
    .bind(right.valid_to)
    .bind(right.day_start)
    .bind(right.day_end)
    .bind(past_days_column(right.past_record_days))
    .bind(&right.remarks)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("insert_right", e))?;

    let id: i32 = row
        .try_get("rights_id")
        .map_err(|e| map_sqlx_error("insert_right", e))?;
    Ok(RightsId::new(id))
}

async fn update_right(
    tx: &mut Transaction<'_, Postgres>,
    tenant_id: TenantId,
    right: &MenuRight,
) -> Result<(), RepositoryError> {
    let p = right.permissions;
    let result = sqlx::query(
        r#"
        UPDATE menu_rights SET
            is_show = $3, is_add = $4, is_edit = $5, is_delete = $6,
            is_print = $7, is_export = $8, is_verify = $9,
            is_active = $10, valid_from = $11, valid_to = $12,
            day_start = $13, day_end = $14, past_record_days = $15, remarks = $16
        WHERE tenant_id = $1 AND rights_id = $2
        "#,
    )
    .bind(tenant_id.as_uuid())
    .bind(right.id.get())
    .bind(p.show)
    .bind(p.add)
    .bind(p.edit)
    .bind(p.delete)
    .bind(p.print)
    .bind(p.export)
    .bind(p.verify)
    .bind(right.active)
    .bind(right.valid_from)
    .bind(right.valid_to)
    .bind(right.day_start)
    .bind(right.day_end)
    .bind(past_days_column(right.past_record_days))
    .bind(&right.remarks)
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("update_right", e))?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::Conflict(format!(
            "rights row {} does not exist",
            right.id
        )));
    }
    Ok(())
}

fn past_days_column(days: Option<u32>) -> Option<i32> {
    days.map(|d| i32::try_from(d).unwrap_or(i32::MAX))
}

fn menu_from_row(row: &sqlx::postgres::PgRow) -> Result<MenuNode, sqlx::Error> {
    Ok(MenuNode {
        id: MenuId::new(row.try_get("menu_id")?),
        name: row.try_get("name")?,
        display_name: row.try_get("display_name")?,
        url: row.try_get("url")?,
        parent_id: MenuId::new(row.try_get("parent_id")?),
        sequence: row.try_get("sequence")?,
        active: row.try_get("is_active")?,
    })
}

fn right_from_row(row: &sqlx::postgres::PgRow) -> Result<MenuRight, sqlx::Error> {
    let permissions = Permissions {
        show: row.try_get("is_show")?,
        add: row.try_get("is_add")?,
        edit: row.try_get("is_edit")?,
        delete: row.try_get("is_delete")?,
        print: row.try_get("is_print")?,
        export: row.try_get("is_export")?,
        verify: row.try_get("is_verify")?,
    };
    let past_record_days: Option<i32> = row.try_get("past_record_days")?;

    Ok(MenuRight {
        id: RightsId::new(row.try_get("rights_id")?),
        user_id: UserId::new(row.try_get("user_id")?),
        menu_id: MenuId::new(row.try_get("menu_id")?),
        permissions,
        active: row.try_get("is_active")?,
        valid_from: row.try_get::<Option<NaiveDate>, _>("valid_from")?,
        valid_to: row.try_get::<Option<NaiveDate>, _>("valid_to")?,
        day_start: row.try_get::<Option<NaiveTime>, _>("day_start")?,
        day_end: row.try_get::<Option<NaiveTime>, _>("day_end")?,
        past_record_days: past_record_days.and_then(|d| u32::try_from(d).ok()),
        remarks: row.try_get("remarks")?,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                // Unique violation: a second row for the same (user, menu).
                Some("23505") => RepositoryError::Conflict(msg),
                _ => RepositoryError::Storage(msg),
            }
        }
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            RepositoryError::Unavailable(format!("connection pool unavailable in {}", operation))
        }
        _ => RepositoryError::Storage(format!("sqlx error in {}: {}", operation, err)),
    }
}
