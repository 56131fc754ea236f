// ==========================================
// 地铁票务管理后台 - 票价规则领域模型
// ==========================================
// 依据: price_setting 集合 (单条当前生效规则)
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// PriceRule - 按站距计价规则
// ==========================================
// 规则: 起步 N 站内收起步价,超出部分按站加价
// 说明: base_station_count 是站数,不是里程;调用方以站序差作为距离
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRule {
    // ===== 主键 =====
    pub id: Option<String>, // 记录ID (新建前为空)

    // ===== 规则参数 =====
    pub name: String,                 // 规则名称
    pub base_station_count: u32,      // 起步价覆盖的站数
    pub base_price: f64,              // 起步价
    pub extra_price_per_station: f64, // 超出后每站加价

    // ===== 审计字段 =====
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PriceRule {
    /// 仅由计价参数构造规则 (其余字段为空)
    pub fn new(base_station_count: u32, base_price: f64, extra_price_per_station: f64) -> Self {
        Self {
            id: None,
            name: String::new(),
            base_station_count,
            base_price,
            extra_price_per_station,
            created_at: None,
            updated_at: None,
        }
    }

    /// 设置规则名称
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for PriceRule {
    /// 管理后台新建规则时的默认值: 3 站内 6000,每多一站 +1000
    fn default() -> Self {
        PriceRule::new(3, 6000.0, 1000.0).with_name("Giá vé mặc định")
    }
}

// ==========================================
// StationPriceCalculation - 单条线路计价明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationPriceCalculation {
    pub from_station: String,  // 起点站ID
    pub to_station: String,    // 终点站ID
    pub distance: i64,         // 站序差 (站数)
    pub calculated_price: f64, // 计算得出的票价
    pub is_base_price: bool,   // 是否落在起步价范围内
}
