// ==========================================
// 地铁票务管理后台 - 车站领域模型
// ==========================================
// 对齐: stations 集合 (按 order_index 升序即线路顺序)
// ==========================================

use crate::domain::types::{StationStatus, StationType};
use serde::{Deserialize, Serialize};

// ==========================================
// Station - 车站
// ==========================================
// 用途: 票价矩阵生成; order_index 的绝对差视为站距
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    // ===== 主键 =====
    pub id: String, // 车站唯一标识

    // ===== 基础信息 =====
    pub code: String,         // 车站编码
    pub station_name: String, // 车站名称
    pub order_index: i64,     // 线路上的顺序位置
    pub zone: String,         // 所属区段

    // ===== 状态 =====
    pub status: StationStatus,
    pub station_type: StationType,

    // ===== 位置 =====
    pub location: Option<(f64, f64)>, // (纬度, 经度)
}

impl Station {
    /// 仅由 ID 与站序构造车站 (用于计价)
    pub fn new(id: impl Into<String>, order_index: i64) -> Self {
        let id = id.into();
        Self {
            code: id.clone(),
            station_name: id.clone(),
            id,
            order_index,
            zone: String::new(),
            status: StationStatus::Active,
            station_type: StationType::Elevated,
            location: None,
        }
    }

    /// 两站之间的站距 (站序差的绝对值,超出 i64 时取 i64::MAX)
    pub fn distance_to(&self, other: &Station) -> i64 {
        i64::try_from(self.order_index.abs_diff(other.order_index)).unwrap_or(i64::MAX)
    }
}
