// ==========================================
// 地铁票务管理后台 - 票种目录数据仓储
// ==========================================

use crate::domain::ticket::TicketType;
use crate::domain::types::TicketTypeStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// 票种目录仓储
pub struct TicketTypeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TicketTypeRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部票种 (按票价升序)
    pub fn list_all(&self) -> RepositoryResult<Vec<TicketType>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, ticket_name, description, price, duration_days, type_key,
                   categories, status, note
            FROM ticket_types
            ORDER BY price ASC, id ASC
            "#,
        )?;
        let items = stmt
            .query_map([], map_ticket_type_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// 新增票种 (id 为空时生成 UUID)
    pub fn insert(&self, item: &TicketType) -> RepositoryResult<String> {
        let id = if item.id.trim().is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            item.id.clone()
        };

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO ticket_types (
                id, ticket_name, description, price, duration_days, type_key,
                categories, status, note
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                id,
                item.ticket_name,
                item.description,
                item.price,
                item.duration_days,
                item.type_key,
                item.categories,
                item.status.to_db_str(),
                item.note,
            ],
        )?;
        Ok(id)
    }

    /// 更新票种
    pub fn update(&self, item: &TicketType) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE ticket_types SET
                ticket_name = ?2, description = ?3, price = ?4, duration_days = ?5,
                type_key = ?6, categories = ?7, status = ?8, note = ?9
            WHERE id = ?1
            "#,
            params![
                item.id,
                item.ticket_name,
                item.description,
                item.price,
                item.duration_days,
                item.type_key,
                item.categories,
                item.status.to_db_str(),
                item.note,
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "TicketType".to_string(),
                id: item.id.clone(),
            });
        }
        Ok(())
    }

    /// 删除票种
    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM ticket_types WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "TicketType".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 票种总数
    pub fn count(&self) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM ticket_types", [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }
}

fn map_ticket_type_row(row: &Row<'_>) -> rusqlite::Result<TicketType> {
    Ok(TicketType {
        id: row.get(0)?,
        ticket_name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        duration_days: row.get(4)?,
        type_key: row.get(5)?,
        categories: row.get(6)?,
        status: TicketTypeStatus::from_str(&row.get::<_, String>(7)?),
        note: row.get(8)?,
    })
}
