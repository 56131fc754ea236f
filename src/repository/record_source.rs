// ==========================================
// 地铁票务管理后台 - 记录数据源 Trait
// ==========================================
// 职责: "读取某集合的全部记录",统计与计价只依赖该接口
// 实现者: SqliteRecordSource (rusqlite); 测试中可替换为内存实现
// 约束: 任一读取失败整体返回错误,不做部分结果
// ==========================================

use crate::domain::price_rule::PriceRule;
use crate::domain::station::Station;
use crate::domain::ticket::{Ticket, TicketType};
use crate::domain::user::User;
use crate::repository::error::RepositoryResult;
use crate::repository::price_setting_repo::PriceSettingRepository;
use crate::repository::station_repo::StationRepository;
use crate::repository::ticket_repo::UserTicketRepository;
use crate::repository::ticket_type_repo::TicketTypeRepository;
use crate::repository::user_repo::UserRepository;
use async_trait::async_trait;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

#[async_trait]
pub trait RecordSource: Send + Sync {
    /// 读取全部已售车票
    async fn fetch_tickets(&self) -> RepositoryResult<Vec<Ticket>>;

    /// 读取全部车站 (按线路顺序)
    async fn fetch_stations(&self) -> RepositoryResult<Vec<Station>>;

    /// 读取当前票价规则 (未配置时为 None)
    async fn fetch_price_rule(&self) -> RepositoryResult<Option<PriceRule>>;

    /// 读取票种目录
    async fn fetch_ticket_types(&self) -> RepositoryResult<Vec<TicketType>>;

    /// 读取全部注册用户
    async fn fetch_users(&self) -> RepositoryResult<Vec<User>>;
}

// ==========================================
// SqliteRecordSource - 基于 SQLite 仓储的数据源
// ==========================================
pub struct SqliteRecordSource {
    station_repo: StationRepository,
    ticket_repo: UserTicketRepository,
    price_setting_repo: PriceSettingRepository,
    ticket_type_repo: TicketTypeRepository,
    user_repo: UserRepository,
}

impl SqliteRecordSource {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            station_repo: StationRepository::new(conn.clone()),
            ticket_repo: UserTicketRepository::new(conn.clone()),
            price_setting_repo: PriceSettingRepository::new(conn.clone()),
            ticket_type_repo: TicketTypeRepository::new(conn.clone()),
            user_repo: UserRepository::new(conn),
        }
    }
}

#[async_trait]
impl RecordSource for SqliteRecordSource {
    async fn fetch_tickets(&self) -> RepositoryResult<Vec<Ticket>> {
        self.ticket_repo.list_all()
    }

    async fn fetch_stations(&self) -> RepositoryResult<Vec<Station>> {
        self.station_repo.list_all()
    }

    async fn fetch_price_rule(&self) -> RepositoryResult<Option<PriceRule>> {
        self.price_setting_repo.get_current()
    }

    async fn fetch_ticket_types(&self) -> RepositoryResult<Vec<TicketType>> {
        self.ticket_type_repo.list_all()
    }

    async fn fetch_users(&self) -> RepositoryResult<Vec<User>> {
        self.user_repo.list_all()
    }
}
