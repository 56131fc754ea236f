// ==========================================
// 地铁票务管理后台 - 票价规则数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约定: price_setting 表中的第一条记录即当前生效规则
// ==========================================

use crate::domain::price_rule::PriceRule;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

/// 数据库中的原始行 (起步站数尚未做范围检查)
struct PriceSettingRow {
    id: String,
    name: String,
    base_station_count: i64,
    base_price: f64,
    extra_price_per_station: f64,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl PriceSettingRow {
    fn into_rule(self) -> RepositoryResult<PriceRule> {
        let base_station_count =
            u32::try_from(self.base_station_count).map_err(|_| RepositoryError::FieldValueError {
                field: "base_station_count".to_string(),
                message: format!("起步站数超出范围: {}", self.base_station_count),
            })?;

        Ok(PriceRule {
            id: Some(self.id),
            name: self.name,
            base_station_count,
            base_price: self.base_price,
            extra_price_per_station: self.extra_price_per_station,
            created_at: self.created_at.as_deref().and_then(parse_timestamp),
            updated_at: self.updated_at.as_deref().and_then(parse_timestamp),
        })
    }
}

// ==========================================
// PriceSettingRepository - 票价规则仓储
// ==========================================

/// 票价规则仓储
pub struct PriceSettingRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PriceSettingRepository {
    /// 从共享连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取当前票价规则
    ///
    /// # 返回
    /// - Ok(Some(PriceRule)): 当前规则
    /// - Ok(None): 尚未配置
    pub fn get_current(&self) -> RepositoryResult<Option<PriceRule>> {
        let conn = self.get_conn()?;
        let row = conn
            .query_row(
                r#"
                SELECT id, name, base_station_count, base_price, extra_price_per_station,
                       created_at, updated_at
                FROM price_setting
                ORDER BY created_at ASC, id ASC
                LIMIT 1
                "#,
                [],
                |row| {
                    Ok(PriceSettingRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        base_station_count: row.get(2)?,
                        base_price: row.get(3)?,
                        extra_price_per_station: row.get(4)?,
                        created_at: row.get(5)?,
                        updated_at: row.get(6)?,
                    })
                },
            )
            .optional()?;

        row.map(PriceSettingRow::into_rule).transpose()
    }

    /// 新增票价规则
    ///
    /// # 返回
    /// - Ok(String): 新记录ID
    pub fn insert(&self, rule: &PriceRule) -> RepositoryResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO price_setting (
                id, name, base_station_count, base_price, extra_price_per_station,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
            params![
                id,
                rule.name,
                i64::from(rule.base_station_count),
                rule.base_price,
                rule.extra_price_per_station,
                now,
            ],
        )?;
        Ok(id)
    }

    /// 更新当前票价规则 (覆盖第一条记录)
    ///
    /// # 返回
    /// - Err(RepositoryError::NotFound): 尚无任何规则
    pub fn update_current(&self, rule: &PriceRule) -> RepositoryResult<String> {
        let current = self.get_current()?.ok_or_else(|| RepositoryError::NotFound {
            entity: "PriceSetting".to_string(),
            id: "current".to_string(),
        })?;
        let id = current.id.unwrap_or_default();

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            UPDATE price_setting SET
                name = ?2, base_station_count = ?3, base_price = ?4,
                extra_price_per_station = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
            params![
                id,
                rule.name,
                i64::from(rule.base_station_count),
                rule.base_price,
                rule.extra_price_per_station,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(id)
    }

    /// 保存票价规则: 已有则覆盖当前规则,否则新建
    pub fn save(&self, rule: &PriceRule) -> RepositoryResult<String> {
        match self.update_current(rule) {
            Err(RepositoryError::NotFound { .. }) => self.insert(rule),
            other => other,
        }
    }

    /// 删除票价规则
    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM price_setting WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "PriceSetting".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}
