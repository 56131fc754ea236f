// ==========================================
// 地铁票务管理后台 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 票价计算 (按站距)、营收统计 (按日/周/月) 与用户/车票管理
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "vi");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 计价与统计规则
pub mod engine;

// 导入层 - CSV 数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Granularity, StationStatus, StationType, TicketStatus};

// 领域实体
pub use domain::{
    Activity, PriceRule, RevenueBucket, RevenueSeries, RevenueSummary, Station,
    StationPriceCalculation, Ticket, TicketType, User, UserTicketView,
};

// 引擎
pub use engine::{
    BucketTimezone, CompactPriceMatrix, FareError, FarePricingEngine, RevenueAggregator,
    RevenueOptions,
};

// API
pub use api::{ApiError, DashboardApi, FareApi, RevenueApi, UserApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Metro Fare & Revenue";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
