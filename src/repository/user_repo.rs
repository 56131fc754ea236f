// ==========================================
// 地铁票务管理后台 - 用户数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: created_at 以 RFC3339 文本存储,无法解析时按缺失处理
// ==========================================

use crate::domain::user::User;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const USER_COLUMNS: &str = r#"
    id, username, name, email, phonenumber, role, created_at
"#;

// ==========================================
// UserRepository - 用户仓储
// ==========================================

/// 用户仓储
/// 职责: 管理 users 表的 CRUD 操作
pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    /// 从共享连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部用户 (按注册时间倒序,无注册时间的排最后)
    pub fn list_all(&self) -> RepositoryResult<Vec<User>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM users ORDER BY created_at DESC, id ASC",
            USER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let users = stmt
            .query_map([], map_user_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// 按ID查询用户
    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let user = conn.query_row(&sql, params![id], map_user_row).optional()?;
        Ok(user)
    }

    /// 新增用户
    ///
    /// id 为空时生成 UUID; created_at 缺失时取当前时间
    ///
    /// # 返回
    /// - Ok(String): 用户ID
    pub fn insert(&self, user: &User) -> RepositoryResult<String> {
        let id = if user.id.trim().is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            user.id.clone()
        };
        let created_at = user.created_at.unwrap_or_else(Utc::now);

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO users (id, username, name, email, phonenumber, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                id,
                user.username,
                user.name,
                user.email,
                user.phonenumber,
                user.role,
                created_at.to_rfc3339(),
            ],
        )?;
        tracing::debug!(user_id = %id, "用户已创建");
        Ok(id)
    }

    /// 更新用户资料 (不修改注册时间)
    pub fn update(&self, user: &User) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE users SET
                username = ?2, name = ?3, email = ?4, phonenumber = ?5, role = ?6
            WHERE id = ?1
            "#,
            params![
                user.id,
                user.username,
                user.name,
                user.email,
                user.phonenumber,
                user.role,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "User".to_string(),
                id: user.id.clone(),
            });
        }
        Ok(())
    }

    /// 删除用户
    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "User".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 用户总数
    pub fn count(&self) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }
}

fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(raw, error = %e, "created_at 无法解析,按缺失处理");
            None
        }
    }
}

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let created_at: Option<String> = row.get(6)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        phonenumber: row.get(4)?,
        role: row.get(5)?,
        created_at: created_at.as_deref().and_then(parse_created_at),
    })
}
