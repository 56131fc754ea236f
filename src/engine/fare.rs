// ==========================================
// 地铁票务管理后台 - 票价计算引擎
// ==========================================
// 职责: 按站距计算票价 + 生成全线票价矩阵
// 输入: 车站列表 (站序) + 票价规则
// 输出: 票价 / "起点-终点" → 票价 映射
// ==========================================
// 纯函数: 不访问存储,不持有状态
// ==========================================

use crate::domain::price_rule::{PriceRule, StationPriceCalculation};
use crate::domain::station::Station;
use crate::engine::error::{FareError, FareResult};
use std::collections::HashMap;
use tracing::instrument;

// ==========================================
// FarePricingEngine - 票价计算引擎
// ==========================================
#[derive(Debug, Default)]
pub struct FarePricingEngine;

impl FarePricingEngine {
    /// 创建新的票价计算引擎
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 规则校验
    // ==========================================

    /// 校验票价规则
    ///
    /// # 返回
    /// - Ok(()): 起步价与加价均为非负有限数
    /// - Err(FareError::Configuration): 指出违规字段
    pub fn validate_rule(&self, rule: &PriceRule) -> FareResult<()> {
        check_money("base_price", rule.base_price)?;
        check_money("extra_price_per_station", rule.extra_price_per_station)?;
        Ok(())
    }

    /// 由原始输入构造并校验票价规则
    ///
    /// base_station_count 以有符号整数接收,负数直接拒绝
    pub fn build_rule(
        &self,
        name: &str,
        base_station_count: i64,
        base_price: f64,
        extra_price_per_station: f64,
    ) -> FareResult<PriceRule> {
        if base_station_count < 0 {
            return Err(FareError::configuration(
                "base_station_count",
                format!("起步站数不能为负数: {}", base_station_count),
            ));
        }
        let base_station_count = u32::try_from(base_station_count).map_err(|_| {
            FareError::configuration(
                "base_station_count",
                format!("起步站数超出范围: {}", base_station_count),
            )
        })?;

        let rule = PriceRule::new(base_station_count, base_price, extra_price_per_station)
            .with_name(name.trim());
        self.validate_rule(&rule)?;
        Ok(rule)
    }

    // ==========================================
    // 核心计价
    // ==========================================

    /// 计算单程票价
    ///
    /// 规则:
    /// - distance ≤ base_station_count → base_price
    /// - 否则 → base_price + (distance - base_station_count) × extra_price_per_station
    ///
    /// 负距离按 0 处理
    pub fn calculate_price(&self, distance: i64, rule: &PriceRule) -> f64 {
        let distance = distance.max(0);
        let base = i64::from(rule.base_station_count);

        if distance <= base {
            return rule.base_price;
        }

        let extra_stations = (distance - base) as f64;
        rule.base_price + extra_stations * rule.extra_price_per_station
    }

    /// 生成全线票价矩阵
    ///
    /// 对每一对不同位置的车站 (i < j) 计算票价,
    /// 同时写入 "i-j" 与 "j-i" 两个方向的键,查询时无需区分方向
    #[instrument(skip(self, stations, rule), fields(station_count = stations.len()))]
    pub fn generate_price_matrix(
        &self,
        stations: &[Station],
        rule: &PriceRule,
    ) -> HashMap<String, f64> {
        let mut matrix = HashMap::with_capacity(stations.len() * stations.len());

        for (i, from) in stations.iter().enumerate() {
            for to in stations.iter().skip(i + 1) {
                let price = self.calculate_price(from.distance_to(to), rule);
                matrix.insert(directional_key(&from.id, &to.id), price);
                matrix.insert(directional_key(&to.id, &from.id), price);
            }
        }

        tracing::debug!(entries = matrix.len(), "票价矩阵生成完成");
        matrix
    }

    /// 生成紧凑票价矩阵 (每对车站只存一份)
    pub fn generate_compact_matrix(
        &self,
        stations: &[Station],
        rule: &PriceRule,
    ) -> CompactPriceMatrix {
        let mut prices = HashMap::new();

        for (i, from) in stations.iter().enumerate() {
            for to in stations.iter().skip(i + 1) {
                let price = self.calculate_price(from.distance_to(to), rule);
                prices.insert(canonical_pair(&from.id, &to.id), price);
            }
        }

        CompactPriceMatrix { prices }
    }

    /// 计算两站之间的计价明细
    ///
    /// # 返回
    /// - Err(FareError::StationNotFound): 任一站ID不在车站列表中
    pub fn quote(
        &self,
        from_station_id: &str,
        to_station_id: &str,
        stations: &[Station],
        rule: &PriceRule,
    ) -> FareResult<StationPriceCalculation> {
        let find = |id: &str| {
            stations
                .iter()
                .find(|s| s.id == id)
                .ok_or_else(|| FareError::StationNotFound(id.to_string()))
        };
        let from = find(from_station_id)?;
        let to = find(to_station_id)?;

        let distance = from.distance_to(to);
        Ok(StationPriceCalculation {
            from_station: from.id.clone(),
            to_station: to.id.clone(),
            distance,
            calculated_price: self.calculate_price(distance, rule),
            is_base_price: distance <= i64::from(rule.base_station_count),
        })
    }
}

// ==========================================
// CompactPriceMatrix - 规范化键的票价矩阵
// ==========================================
// 键为字典序较小者在前的车站对,查询时自动归一化方向
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompactPriceMatrix {
    prices: HashMap<(String, String), f64>,
}

impl CompactPriceMatrix {
    /// 查询两站之间的票价 (与方向无关)
    pub fn price_between(&self, a: &str, b: &str) -> Option<f64> {
        self.prices.get(&canonical_pair(a, b)).copied()
    }

    /// 车站对数量
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// 展开为双向键映射 ("A-B" 与 "B-A")
    pub fn to_directional_map(&self) -> HashMap<String, f64> {
        let mut map = HashMap::with_capacity(self.prices.len() * 2);
        for ((a, b), price) in &self.prices {
            map.insert(directional_key(a, b), *price);
            map.insert(directional_key(b, a), *price);
        }
        map
    }
}

/// 矩阵键: "起点ID-终点ID"
pub fn directional_key(from: &str, to: &str) -> String {
    format!("{}-{}", from, to)
}

fn canonical_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn check_money(field: &str, value: f64) -> FareResult<()> {
    if !value.is_finite() {
        return Err(FareError::configuration(field, format!("金额必须为有限数: {}", value)));
    }
    if value < 0.0 {
        return Err(FareError::configuration(field, format!("金额不能为负数: {}", value)));
    }
    Ok(())
}
