// ==========================================
// 地铁票务管理后台 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod activity;
pub mod price_rule;
pub mod revenue;
pub mod station;
pub mod ticket;
pub mod types;
pub mod user;

// 重导出核心类型
pub use activity::{Activity, ActivityKind};
pub use price_rule::{PriceRule, StationPriceCalculation};
pub use revenue::{RevenueBucket, RevenueSeries, RevenueSummary};
pub use station::Station;
pub use ticket::{Ticket, TicketType};
pub use types::{Granularity, StationStatus, StationType, TicketStatus, TicketTypeStatus};
pub use user::{User, UserTicketView};
