// ==========================================
// 地铁票务管理后台 - 应用状态
// ==========================================
// 职责: 打开数据库、初始化仓储/配置/API 并显式注入,不使用全局单例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{DashboardApi, FareApi, ImportApi, RevenueApi, UserApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::importer::CsvImporter;
use crate::repository::{PriceSettingRepository, RecordSource, SqliteRecordSource, UserRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "METRO_FARE_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 票价API
    pub fare_api: Arc<FareApi>,

    /// 营收API
    pub revenue_api: Arc<RevenueApi>,

    /// 仪表盘API
    pub dashboard_api: Arc<DashboardApi>,

    /// 用户API
    pub user_api: Arc<UserApi>,

    /// CSV 导入API
    pub import_api: Arc<ImportApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径 (":memory:" 可用于临时库)
    ///
    /// # 返回
    /// - Err(String): 数据库打开或建表失败
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let source: Arc<dyn RecordSource> = Arc::new(SqliteRecordSource::new(conn.clone()));
        let price_setting_repo = Arc::new(PriceSettingRepository::new(conn.clone()));
        let user_repo = Arc::new(UserRepository::new(conn.clone()));
        let importer = Arc::new(CsvImporter::new(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let fare_api = Arc::new(FareApi::new(source.clone(), price_setting_repo));
        let revenue_api = Arc::new(RevenueApi::new(source.clone(), config_manager.clone()));
        let dashboard_api = Arc::new(DashboardApi::new(source.clone(), config_manager.clone()));
        let user_api = Arc::new(UserApi::new(user_repo, source, config_manager.clone()));
        let import_api = Arc::new(ImportApi::new(importer));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            config_manager,
            fare_api,
            revenue_api,
            dashboard_api,
            user_api,
            import_api,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: 环境变量 METRO_FARE_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./metro_fare.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("metro-fare-revenue");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("metro_fare.db");
        } else {
            tracing::warn!(dir = %dir.display(), "数据目录创建失败，使用当前目录");
        }
    }

    path.to_string_lossy().to_string()
}
