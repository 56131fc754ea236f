// ==========================================
// 地铁票务管理后台 - 领域类型定义
// ==========================================
// 依据: 票务集合 user_tickets / stations / ticket_type 的字段取值
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 车票状态 (Ticket Status)
// ==========================================
// 存储格式: 小写字符串 (与票务集合一致)
// 未知取值按原样保留,统计时不做归一化
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketStatus {
    Unused,        // 未使用
    Active,        // 已激活
    Used,          // 已使用
    Expired,       // 已过期
    Refunded,      // 已退款
    Other(String), // 未知状态 (原样保留)
}

impl TicketStatus {
    /// 从字符串解析状态
    ///
    /// 不认识的取值落入 Other,保留原始字面量
    pub fn from_str(s: &str) -> Self {
        match s {
            "unused" => TicketStatus::Unused,
            "active" => TicketStatus::Active,
            "used" => TicketStatus::Used,
            "expired" => TicketStatus::Expired,
            "refunded" => TicketStatus::Refunded,
            other => TicketStatus::Other(other.to_string()),
        }
    }

    /// 转换为数据库存储的字符串
    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Unused => "unused",
            TicketStatus::Active => "active",
            TicketStatus::Used => "used",
            TicketStatus::Expired => "expired",
            TicketStatus::Refunded => "refunded",
            TicketStatus::Other(raw) => raw.as_str(),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for TicketStatus {
    fn from(s: String) -> Self {
        TicketStatus::from_str(&s)
    }
}

impl From<TicketStatus> for String {
    fn from(status: TicketStatus) -> Self {
        status.as_str().to_string()
    }
}

// ==========================================
// 车站运营状态 (Station Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationStatus {
    Active,      // 运营中
    Maintenance, // 维护中
    Inactive,    // 停用
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl StationStatus {
    /// 从字符串解析状态 (无法识别时默认为 Active)
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "maintenance" => StationStatus::Maintenance,
            "inactive" => StationStatus::Inactive,
            _ => StationStatus::Active,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            StationStatus::Active => "active",
            StationStatus::Maintenance => "maintenance",
            StationStatus::Inactive => "inactive",
        }
    }
}

// ==========================================
// 车站结构类型 (Station Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationType {
    Elevated,    // 高架站
    Underground, // 地下站
}

impl fmt::Display for StationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

impl StationType {
    /// 从字符串解析类型 (无法识别时默认为 Elevated)
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "underground" => StationType::Underground,
            _ => StationType::Elevated,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            StationType::Elevated => "elevated",
            StationType::Underground => "underground",
        }
    }
}

// ==========================================
// 票种上架状态 (Ticket Type Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketTypeStatus {
    Active,   // 在售
    Inactive, // 下架
}

impl TicketTypeStatus {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "inactive" => TicketTypeStatus::Inactive,
            _ => TicketTypeStatus::Active,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            TicketTypeStatus::Active => "active",
            TicketTypeStatus::Inactive => "inactive",
        }
    }
}

// ==========================================
// 营收统计粒度 (Revenue Granularity)
// ==========================================
// 依据: 日期跨度 ≤31 天按日, 32-93 天按周, >93 天按月
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,   // 按日
    Weekly,  // 按周 (周一为起点)
    Monthly, // 按月
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Daily => write!(f, "daily"),
            Granularity::Weekly => write!(f, "weekly"),
            Granularity::Monthly => write!(f, "monthly"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_status_keeps_unknown_literal() {
        let status = TicketStatus::from_str("cancelled");
        assert_eq!(status, TicketStatus::Other("cancelled".to_string()));
        assert_eq!(status.as_str(), "cancelled");
    }

    #[test]
    fn test_ticket_status_serde_lowercase() {
        let json = serde_json::to_string(&TicketStatus::Refunded).unwrap();
        assert_eq!(json, "\"refunded\"");

        let parsed: TicketStatus = serde_json::from_str("\"unused\"").unwrap();
        assert_eq!(parsed, TicketStatus::Unused);
    }

    #[test]
    fn test_station_status_default() {
        assert_eq!(StationStatus::from_str("MAINTENANCE"), StationStatus::Maintenance);
        assert_eq!(StationStatus::from_str("??"), StationStatus::Active);
    }
}
