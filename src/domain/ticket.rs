// ==========================================
// 地铁票务管理后台 - 车票领域模型
// ==========================================
// 对齐: user_tickets 集合 (已售车票) / ticket_type 集合 (票种目录)
// ==========================================

use crate::domain::types::{TicketStatus, TicketTypeStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Ticket - 已售车票
// ==========================================
// 用途: 营收统计的只读输入,创建/修改在统计之外完成
// 缺省策略: price 缺失按 0 计入合计; booking_time 缺失则不参与按日统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    // ===== 主键 =====
    pub id: String,
    pub user_id: String,

    // ===== 票种信息 =====
    pub ticket_name: String,
    pub ticket_type: String, // 票种分类键 (自由文本)
    pub status: TicketStatus,

    // ===== 计价 =====
    pub price: Option<f64>,

    // ===== 时间 =====
    pub booking_time: Option<DateTime<Utc>>, // 购票时间
    pub duration_days: i64,                  // 有效天数

    // ===== 线路 =====
    pub start_station_code: Option<String>,
    pub end_station_code: Option<String>,
}

impl Ticket {
    /// 构造统计所需的最小车票记录
    pub fn new(
        id: impl Into<String>,
        ticket_type: impl Into<String>,
        status: TicketStatus,
        price: Option<f64>,
        booking_time: Option<DateTime<Utc>>,
    ) -> Self {
        let ticket_type = ticket_type.into();
        Self {
            id: id.into(),
            user_id: String::new(),
            ticket_name: ticket_type.clone(),
            ticket_type,
            status,
            price,
            booking_time,
            duration_days: 0,
            start_station_code: None,
            end_station_code: None,
        }
    }

    /// 计入合计的票价 (缺失按 0)
    pub fn price_or_zero(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }
}

// ==========================================
// TicketType - 票种目录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketType {
    pub id: String,
    pub ticket_name: String,
    pub description: String,
    pub price: f64,
    pub duration_days: i64,
    pub type_key: String,   // 与 Ticket.ticket_type 对应的分类键
    pub categories: String, // 适用人群
    pub status: TicketTypeStatus,
    pub note: Option<String>,
}
