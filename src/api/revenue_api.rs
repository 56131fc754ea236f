// ==========================================
// 地铁票务管理后台 - 营收 API
// ==========================================
// 职责: 营收总览 / 日期区间序列 / 最近 N 天 / 本周 / 本月
// 架构: API 层 → RecordSource (全量读取车票) → RevenueAggregator
// 参数来源: ConfigManager (统计时区、标签语言、默认窗口)
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::domain::revenue::{RevenueSeries, RevenueSummary};
use crate::domain::ticket::Ticket;
use crate::engine::revenue::{RevenueAggregator, MAX_WINDOW_DAYS};
use crate::repository::record_source::RecordSource;

// ==========================================
// RevenueApi - 营收 API
// ==========================================
pub struct RevenueApi {
    source: Arc<dyn RecordSource>,
    config_manager: Arc<ConfigManager>,
}

impl RevenueApi {
    pub fn new(source: Arc<dyn RecordSource>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            source,
            config_manager,
        }
    }

    /// 营收总览 (总额 + 按状态/票种计数)
    pub async fn get_summary(&self) -> ApiResult<RevenueSummary> {
        let (aggregator, tickets) = self.load().await?;
        Ok(aggregator.summarize(&tickets))
    }

    /// 日期区间营收序列
    ///
    /// # 参数
    /// - start_date / end_date: YYYY-MM-DD,含首尾;顺序颠倒时自动交换
    pub async fn get_revenue_by_date_range(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> ApiResult<RevenueSeries> {
        let start = parse_date("start_date", start_date)?;
        let end = parse_date("end_date", end_date)?;

        let (aggregator, tickets) = self.load().await?;
        let series = aggregator.bucket_by_date_range(&tickets, start, end);
        tracing::info!(
            start = %series.start,
            end = %series.end,
            granularity = %series.granularity,
            buckets = series.buckets.len(),
            "区间营收统计完成"
        );
        Ok(series)
    }

    /// 最近 N 天营收 (按日)
    ///
    /// window_days 为 None 时使用配置的默认窗口;
    /// 超过 MAX_WINDOW_DAYS 返回 InvalidInput
    pub async fn get_revenue_by_window(&self, window_days: Option<u32>) -> ApiResult<RevenueSeries> {
        let window_days = match window_days {
            Some(days) if days > MAX_WINDOW_DAYS => {
                return Err(ApiError::InvalidInput(format!(
                    "window_days 超出范围: {} (最大 {})",
                    days, MAX_WINDOW_DAYS
                )));
            }
            Some(days) => days,
            None => self.config_manager.get_default_window_days()?,
        };

        let (aggregator, tickets) = self.load().await?;
        let today = aggregator.today();
        Ok(aggregator.fixed_window(&tickets, window_days, today))
    }

    /// 本周营收 (周一至今天)
    pub async fn get_current_week(&self) -> ApiResult<RevenueSeries> {
        let (aggregator, tickets) = self.load().await?;
        let today = aggregator.today();
        Ok(aggregator.current_week(&tickets, today))
    }

    /// 本月营收 (1 日至今天)
    pub async fn get_current_month(&self) -> ApiResult<RevenueSeries> {
        let (aggregator, tickets) = self.load().await?;
        let today = aggregator.today();
        Ok(aggregator.current_month(&tickets, today))
    }

    /// 读取统计参数与全部车票;读取失败整体返回错误
    async fn load(&self) -> ApiResult<(RevenueAggregator, Vec<Ticket>)> {
        let options = self.config_manager.revenue_options()?;
        let tickets = self.source.fetch_tickets().await.map_err(|e| {
            tracing::warn!(error = %e, "车票读取失败");
            ApiError::from(e)
        })?;
        tracing::debug!(ticket_count = tickets.len(), timezone = %options.timezone, "车票已加载");
        Ok((RevenueAggregator::new(options), tickets))
    }
}

fn parse_date(field: &str, raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::InvalidInput(format!("{} 日期格式错误（期望 YYYY-MM-DD）: {}", field, raw)))
}
