// ==========================================
// 地铁票务管理后台 - 近期动态
// ==========================================
// 来源: 用户注册 (users.created_at) / 车票购买 (user_tickets.booking_time)
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 动态类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    User,   // 用户注册
    Ticket, // 车票购买
}

impl ActivityKind {
    /// 动态ID前缀
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::User => "user",
            ActivityKind::Ticket => "ticket",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Activity - 仪表盘动态条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String, // "{kind}_{记录ID}"
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,      // 本地化描述
    pub timestamp: DateTime<Utc>, // 发生时间
    pub time: String,             // 统计时区下的 "HH:MM"
}
