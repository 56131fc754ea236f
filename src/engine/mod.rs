// ==========================================
// 地铁票务管理后台 - 引擎层
// ==========================================
// 职责: 票价计算、营收统计、近期动态与用户联表
// 红线: Engine 不拼 SQL, 只处理内存中的记录
// ==========================================

pub mod activity;
pub mod calendar;
pub mod error;
pub mod fare;
pub mod revenue;

// 重导出核心引擎
pub use activity::{join_ticket_users, recent_activities, RECENT_ACTIVITY_LIMIT};
pub use calendar::BucketTimezone;
pub use error::{FareError, FareResult};
pub use fare::{CompactPriceMatrix, FarePricingEngine};
pub use revenue::{RevenueAggregator, RevenueOptions, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
