// ==========================================
// 地铁票务管理后台 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::engine::calendar::BucketTimezone;
use crate::engine::revenue::{RevenueOptions, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
use crate::i18n::{is_supported_locale, DEFAULT_LOCALE};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        crate::db::ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值 (UPSERT)
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::info!(key, value, "配置已更新");
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有 global 配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let config_map = stmt
            .query_map(params![GLOBAL_SCOPE], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        serde_json::to_string(&config_map).map_err(|e| RepositoryError::Other(e.into()))
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 覆盖同名的 global 配置,快照中没有的键保持不变
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> RepositoryResult<usize> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)
            .map_err(|e| RepositoryError::FieldValueError {
                field: "snapshot_json".to_string(),
                message: e.to_string(),
            })?;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut count = 0;
        for (key, value) in &config_map {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3",
                params![GLOBAL_SCOPE, key, value],
            )?;
        }
        tx.commit()?;

        Ok(count)
    }

    // ===== 营收统计配置 =====

    /// 统计归属时区 (无法解析时回退 Local)
    pub fn get_bucket_timezone(&self) -> RepositoryResult<BucketTimezone> {
        let value = self.get_config_or_default(config_keys::REVENUE_TIMEZONE, "local")?;
        Ok(BucketTimezone::parse(&value).unwrap_or_else(|| {
            tracing::warn!(
                config_key = config_keys::REVENUE_TIMEZONE,
                raw_value = %value,
                "时区配置格式错误，使用本地时区"
            );
            BucketTimezone::Local
        }))
    }

    /// 时间桶标签语言 (不支持的语言回退默认)
    pub fn get_label_locale(&self) -> RepositoryResult<String> {
        let value = self.get_config_or_default(config_keys::REVENUE_LABEL_LOCALE, DEFAULT_LOCALE)?;
        let value = value.trim().to_string();
        if is_supported_locale(&value) {
            Ok(value)
        } else {
            tracing::warn!(
                config_key = config_keys::REVENUE_LABEL_LOCALE,
                raw_value = %value,
                "标签语言不受支持，使用默认语言"
            );
            Ok(DEFAULT_LOCALE.to_string())
        }
    }

    /// 默认滚动窗口天数 (非正数、超过上限或无法解析时回退默认)
    pub fn get_default_window_days(&self) -> RepositoryResult<u32> {
        let value = self.get_config_or_default(
            config_keys::REVENUE_DEFAULT_WINDOW_DAYS,
            &DEFAULT_WINDOW_DAYS.to_string(),
        )?;
        Ok(value
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|d| (1..=MAX_WINDOW_DAYS).contains(d))
            .unwrap_or_else(|| {
                tracing::warn!(
                    config_key = config_keys::REVENUE_DEFAULT_WINDOW_DAYS,
                    raw_value = %value,
                    max = MAX_WINDOW_DAYS,
                    "滚动窗口配置无效，使用默认窗口"
                );
                DEFAULT_WINDOW_DAYS
            }))
    }

    /// 组装营收统计参数
    pub fn revenue_options(&self) -> RepositoryResult<RevenueOptions> {
        Ok(RevenueOptions {
            timezone: self.get_bucket_timezone()?,
            locale: self.get_label_locale()?,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 营收统计
    pub const REVENUE_TIMEZONE: &str = "revenue.timezone";
    pub const REVENUE_LABEL_LOCALE: &str = "revenue.label_locale";
    pub const REVENUE_DEFAULT_WINDOW_DAYS: &str = "revenue.default_window_days";
}
