// ==========================================
// 地铁票务管理后台 - 票价 API
// ==========================================
// 职责: 票价规则维护 + 基于当前规则的单程计价/全线票价矩阵
// 架构: API 层 → RecordSource (读) / PriceSettingRepository (写) → FarePricingEngine
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::price_rule::{PriceRule, StationPriceCalculation};
use crate::domain::station::Station;
use crate::engine::fare::{CompactPriceMatrix, FarePricingEngine};
use crate::repository::price_setting_repo::PriceSettingRepository;
use crate::repository::record_source::RecordSource;

/// 票价规则写入参数
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PriceRuleInput {
    pub name: String,
    pub base_station_count: i64,
    pub base_price: f64,
    pub extra_price_per_station: f64,
}

// ==========================================
// FareApi - 票价 API
// ==========================================
pub struct FareApi {
    source: Arc<dyn RecordSource>,
    price_setting_repo: Arc<PriceSettingRepository>,
    engine: FarePricingEngine,
}

impl FareApi {
    pub fn new(source: Arc<dyn RecordSource>, price_setting_repo: Arc<PriceSettingRepository>) -> Self {
        Self {
            source,
            price_setting_repo,
            engine: FarePricingEngine::new(),
        }
    }

    // ==========================================
    // 规则维护
    // ==========================================

    /// 读取当前票价规则
    ///
    /// # 返回
    /// - Ok(None): 尚未配置
    pub async fn get_price_rule(&self) -> ApiResult<Option<PriceRule>> {
        Ok(self.source.fetch_price_rule().await?)
    }

    /// 保存票价规则 (已有则覆盖,没有则新建)
    pub fn save_price_rule(&self, input: &PriceRuleInput) -> ApiResult<PriceRule> {
        let mut rule = self.build_rule(input)?;
        let id = self.price_setting_repo.save(&rule)?;
        tracing::info!(rule_id = %id, base_station_count = rule.base_station_count, "票价规则已保存");
        rule.id = Some(id);
        Ok(rule)
    }

    /// 更新当前票价规则
    ///
    /// # 返回
    /// - Err(ApiError::NotFound): 尚无规则可更新
    pub fn update_price_rule(&self, input: &PriceRuleInput) -> ApiResult<PriceRule> {
        let mut rule = self.build_rule(input)?;
        let id = self.price_setting_repo.update_current(&rule)?;
        tracing::info!(rule_id = %id, "票价规则已更新");
        rule.id = Some(id);
        Ok(rule)
    }

    /// 删除票价规则
    pub fn delete_price_rule(&self, id: &str) -> ApiResult<()> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("规则ID不能为空".to_string()));
        }
        self.price_setting_repo.delete(id)?;
        Ok(())
    }

    fn build_rule(&self, input: &PriceRuleInput) -> ApiResult<PriceRule> {
        Ok(self.engine.build_rule(
            &input.name,
            input.base_station_count,
            input.base_price,
            input.extra_price_per_station,
        )?)
    }

    // ==========================================
    // 计价
    // ==========================================

    /// 按当前规则计算给定站距的票价
    pub async fn calculate_price(&self, distance: i64) -> ApiResult<f64> {
        let rule = self.current_rule().await?;
        Ok(self.engine.calculate_price(distance, &rule))
    }

    /// 全线票价矩阵 (双向键 "A-B" / "B-A")
    pub async fn get_price_matrix(&self) -> ApiResult<HashMap<String, f64>> {
        let (stations, rule) = self.load_pricing_inputs().await?;
        Ok(self.engine.generate_price_matrix(&stations, &rule))
    }

    /// 全线票价矩阵 (每对车站一份)
    pub async fn get_compact_price_matrix(&self) -> ApiResult<CompactPriceMatrix> {
        let (stations, rule) = self.load_pricing_inputs().await?;
        Ok(self.engine.generate_compact_matrix(&stations, &rule))
    }

    /// 两站之间的计价明细
    pub async fn quote(&self, from_station_id: &str, to_station_id: &str) -> ApiResult<StationPriceCalculation> {
        let (stations, rule) = self.load_pricing_inputs().await?;
        Ok(self
            .engine
            .quote(from_station_id, to_station_id, &stations, &rule)?)
    }

    async fn current_rule(&self) -> ApiResult<PriceRule> {
        let rule = self
            .source
            .fetch_price_rule()
            .await?
            .ok_or_else(|| ApiError::NotFound("当前票价规则".to_string()))?;
        self.engine.validate_rule(&rule)?;
        Ok(rule)
    }

    /// 并发读取车站与当前规则,任一失败整体返回错误
    async fn load_pricing_inputs(&self) -> ApiResult<(Vec<Station>, PriceRule)> {
        let (stations, rule) =
            futures::try_join!(self.source.fetch_stations(), self.source.fetch_price_rule())?;
        let rule = rule.ok_or_else(|| ApiError::NotFound("当前票价规则".to_string()))?;
        self.engine.validate_rule(&rule)?;
        tracing::debug!(station_count = stations.len(), "计价输入已加载");
        Ok((stations, rule))
    }
}
