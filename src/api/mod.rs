// ==========================================
// 地铁票务管理后台 - API 层
// ==========================================
// 职责: 提供业务 API 接口 (票价 / 营收 / 仪表盘 / 用户 / 导入)
// ==========================================

pub mod dashboard_api;
pub mod error;
pub mod fare_api;
pub mod import_api;
pub mod revenue_api;
pub mod user_api;

// 重导出核心类型
pub use dashboard_api::{
    CategoryChart, ChartData, DashboardApi, DashboardOverview, DashboardStats, RevenueChart,
};
pub use error::{ApiError, ApiResult};
pub use fare_api::{FareApi, PriceRuleInput};
pub use import_api::{ImportApi, ImportApiResponse};
pub use revenue_api::RevenueApi;
pub use user_api::{UserApi, UserInput};
