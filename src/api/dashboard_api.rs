// ==========================================
// 地铁票务管理后台 - 仪表盘 API
// ==========================================
// 职责: 仪表盘总览统计 + 图表数据 (状态分布/票种分布/近期营收) + 近期动态
// 架构: API 层 → RecordSource (并发读取) → RevenueAggregator
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::config::config_manager::ConfigManager;
use crate::domain::activity::Activity;
use crate::domain::ticket::Ticket;
use crate::domain::user::User;
use crate::engine::activity::{recent_activities, RECENT_ACTIVITY_LIMIT};
use crate::engine::revenue::RevenueAggregator;
use crate::i18n;
use crate::repository::record_source::RecordSource;

/// 状态分布图配色
pub const STATUS_CHART_COLORS: [&str; 4] = ["#4caf50", "#2196f3", "#ff9800", "#f44336"];

/// 票种分布图配色
pub const TYPE_CHART_COLORS: [&str; 5] = ["#9c27b0", "#00bcd4", "#cddc39", "#ff5722", "#607d8b"];

// ==========================================
// DTO
// ==========================================

/// 仪表盘总览
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_ticket_types: u64,
    pub total_stations: u64,
    pub total_revenue: f64,
    pub total_tickets_sold: u64,
    pub tickets_by_status: BTreeMap<String, u64>,
    pub tickets_by_type: BTreeMap<String, u64>,
}

/// 带配色的分类图
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryChart {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
    pub colors: Vec<String>,
}

/// 营收折线图
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueChart {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

/// 仪表盘图表数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub status_chart: CategoryChart,
    pub type_chart: CategoryChart,
    pub revenue_chart: RevenueChart,
}

/// 仪表盘完整视图
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub stats: DashboardStats,
    pub charts: ChartData,
    pub recent_activities: Vec<Activity>,
}

// ==========================================
// DashboardApi - 仪表盘 API
// ==========================================
pub struct DashboardApi {
    source: Arc<dyn RecordSource>,
    config_manager: Arc<ConfigManager>,
}

impl DashboardApi {
    pub fn new(source: Arc<dyn RecordSource>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            source,
            config_manager,
        }
    }

    /// 仪表盘总览
    ///
    /// 用户、票种、车站、车票四个集合并发读取,任一失败整体返回错误
    pub async fn get_stats(&self) -> ApiResult<DashboardStats> {
        let (users, ticket_types, stations, tickets) = futures::try_join!(
            self.source.fetch_users(),
            self.source.fetch_ticket_types(),
            self.source.fetch_stations(),
            self.source.fetch_tickets(),
        )?;
        Ok(build_stats(users.len(), ticket_types.len(), stations.len(), &tickets))
    }

    /// 仪表盘图表数据
    ///
    /// - 状态/票种图: 由 stats 生成,标签按配置语言本地化,未知键原样显示
    /// - 营收图: 默认窗口 (按日),需要车票明细,因此会再读取一次车票集合;
    ///   同时需要总览与图表时使用 get_overview,车票只读取一次
    pub async fn get_chart_data(&self, stats: &DashboardStats) -> ApiResult<ChartData> {
        let tickets = self.source.fetch_tickets().await?;
        self.build_chart_data(stats, &tickets)
    }

    /// 近期动态 (最新注册与购票合并,取前 5 条)
    pub async fn get_recent_activities(&self) -> ApiResult<Vec<Activity>> {
        let (users, tickets) =
            futures::try_join!(self.source.fetch_users(), self.source.fetch_tickets())?;
        self.build_recent_activities(&users, &tickets)
    }

    /// 仪表盘完整视图: 总览 + 图表 + 近期动态
    ///
    /// 各集合并发读取一次,三部分共用同一份数据
    pub async fn get_overview(&self) -> ApiResult<DashboardOverview> {
        let (users, ticket_types, stations, tickets) = futures::try_join!(
            self.source.fetch_users(),
            self.source.fetch_ticket_types(),
            self.source.fetch_stations(),
            self.source.fetch_tickets(),
        )?;

        let stats = build_stats(users.len(), ticket_types.len(), stations.len(), &tickets);
        let charts = self.build_chart_data(&stats, &tickets)?;
        let recent_activities = self.build_recent_activities(&users, &tickets)?;

        Ok(DashboardOverview {
            stats,
            charts,
            recent_activities,
        })
    }

    fn build_chart_data(&self, stats: &DashboardStats, tickets: &[Ticket]) -> ApiResult<ChartData> {
        let options = self.config_manager.revenue_options()?;
        let window_days = self.config_manager.get_default_window_days()?;

        let status_chart =
            category_chart(&stats.tickets_by_status, "ticket_status", &STATUS_CHART_COLORS, &options.locale);
        let type_chart =
            category_chart(&stats.tickets_by_type, "ticket_type", &TYPE_CHART_COLORS, &options.locale);

        let aggregator = RevenueAggregator::new(options);
        let series = aggregator.fixed_window(tickets, window_days, aggregator.today());

        let revenue_chart = RevenueChart {
            labels: series.buckets.iter().map(|b| b.label.clone()).collect(),
            data: series.buckets.iter().map(|b| b.revenue).collect(),
        };

        Ok(ChartData {
            status_chart,
            type_chart,
            revenue_chart,
        })
    }

    fn build_recent_activities(&self, users: &[User], tickets: &[Ticket]) -> ApiResult<Vec<Activity>> {
        let options = self.config_manager.revenue_options()?;
        Ok(recent_activities(
            users,
            tickets,
            RECENT_ACTIVITY_LIMIT,
            &options.timezone,
            &options.locale,
        ))
    }
}

/// 计数 + 车票汇总 → 总览
fn build_stats(
    total_users: usize,
    total_ticket_types: usize,
    total_stations: usize,
    tickets: &[Ticket],
) -> DashboardStats {
    let summary = RevenueAggregator::default().summarize(tickets);
    tracing::info!(
        users = total_users,
        ticket_types = total_ticket_types,
        stations = total_stations,
        tickets = summary.total_count,
        "仪表盘总览统计完成"
    );

    DashboardStats {
        total_users: total_users as u64,
        total_ticket_types: total_ticket_types as u64,
        total_stations: total_stations as u64,
        total_revenue: summary.total_revenue,
        total_tickets_sold: summary.total_count,
        tickets_by_status: summary.by_status,
        tickets_by_type: summary.by_type,
    }
}

/// 计数表 → 分类图 (配色按顺序截取,类别多于配色时不再补色)
fn category_chart(
    counts: &BTreeMap<String, u64>,
    label_namespace: &str,
    palette: &[&str],
    locale: &str,
) -> CategoryChart {
    let labels = counts
        .keys()
        .map(|key| {
            i18n::t_in_opt(locale, &format!("{}.{}", label_namespace, key))
                .unwrap_or_else(|| key.clone())
        })
        .collect();

    CategoryChart {
        labels,
        data: counts.values().copied().collect(),
        colors: palette
            .iter()
            .take(counts.len())
            .map(|c| c.to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_chart_labels_and_palette() {
        let mut counts = BTreeMap::new();
        counts.insert("refunded".to_string(), 1);
        counts.insert("unused".to_string(), 3);
        counts.insert("weird".to_string(), 2);

        let chart = category_chart(&counts, "ticket_status", &STATUS_CHART_COLORS, "vi");
        assert_eq!(chart.labels, vec!["Đã hoàn tiền", "Chưa sử dụng", "weird"]);
        assert_eq!(chart.data, vec![1, 3, 2]);
        assert_eq!(chart.colors, vec!["#4caf50", "#2196f3", "#ff9800"]);
    }

    #[test]
    fn test_category_chart_more_categories_than_colors() {
        let counts: BTreeMap<String, u64> = (0..7).map(|i| (format!("t{}", i), 1)).collect();
        let chart = category_chart(&counts, "ticket_type", &TYPE_CHART_COLORS, "en");
        assert_eq!(chart.labels.len(), 7);
        assert_eq!(chart.colors.len(), 5);
    }
}
