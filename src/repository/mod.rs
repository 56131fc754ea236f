// ==========================================
// 地铁票务管理后台 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod price_setting_repo;
pub mod record_source;
pub mod station_repo;
pub mod ticket_repo;
pub mod ticket_type_repo;
pub mod user_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use price_setting_repo::PriceSettingRepository;
pub use record_source::{RecordSource, SqliteRecordSource};
pub use station_repo::StationRepository;
pub use ticket_repo::UserTicketRepository;
pub use ticket_type_repo::TicketTypeRepository;
pub use user_repo::UserRepository;
