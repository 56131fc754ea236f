// ==========================================
// 地铁票务管理后台 - 营收统计结果模型
// ==========================================

use crate::domain::types::Granularity;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// RevenueBucket - 营收时间桶
// ==========================================
// date_key: 按日 YYYY-MM-DD / 按周 周一日期 / 按月 YYYY-MM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBucket {
    pub date_key: String,
    pub label: String, // 图表显示标签
    pub revenue: f64,
    pub ticket_count: u64,
}

// ==========================================
// RevenueSeries - 营收时间序列 (含合计)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSeries {
    pub granularity: Granularity,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub buckets: Vec<RevenueBucket>,
    pub total_revenue: f64,
    pub total_tickets: u64,
}

impl RevenueSeries {
    /// 由有序时间桶汇总出合计
    pub fn from_buckets(
        granularity: Granularity,
        start: NaiveDate,
        end: NaiveDate,
        buckets: Vec<RevenueBucket>,
    ) -> Self {
        let total_revenue = buckets.iter().map(|b| b.revenue).sum();
        let total_tickets = buckets.iter().map(|b| b.ticket_count).sum();
        Self {
            granularity,
            start,
            end,
            buckets,
            total_revenue,
            total_tickets,
        }
    }
}

// ==========================================
// RevenueSummary - 营收总览
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub total_count: u64,
    pub by_status: BTreeMap<String, u64>, // 状态 → 张数
    pub by_type: BTreeMap<String, u64>,   // 票种 → 张数
}
