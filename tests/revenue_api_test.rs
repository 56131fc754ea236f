// ==========================================
// RevenueApi 集成测试
// ==========================================
// 测试范围:
// 1. 区间序列: 3 天场景、日期格式校验、时区配置
// 2. 默认窗口取自配置,超过上限的窗口被拒绝或回退
// 3. 数据源失败整体上抛
// ==========================================


use std::sync::Arc;

use chrono::Utc;
use metro_fare_revenue::api::{ApiError, RevenueApi};
use metro_fare_revenue::config::config_keys;
use metro_fare_revenue::domain::{Granularity, TicketStatus};
use metro_fare_revenue::engine::{DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
use test_helpers::{memory_config, ticket, utc, FailingSource, InMemorySource};

fn utc_config() -> Vec<(&'static str, &'static str)> {
    vec![(config_keys::REVENUE_TIMEZONE, "+00:00")]
}

#[tokio::test]
async fn test_three_day_range_scenario() {
    let source = InMemorySource {
        tickets: vec![
            ticket("T1", "daily1", TicketStatus::Used, Some(10000.0), Some(utc(2025, 10, 1, 9))),
            ticket("T2", "daily1", TicketStatus::Used, Some(20000.0), Some(utc(2025, 10, 3, 9))),
        ],
        ..Default::default()
    };
    let api = RevenueApi::new(Arc::new(source), memory_config(&utc_config()));

    let series = api
        .get_revenue_by_date_range("2025-10-01", "2025-10-03")
        .await
        .unwrap();
    assert_eq!(series.granularity, Granularity::Daily);
    let revenue: Vec<f64> = series.buckets.iter().map(|b| b.revenue).collect();
    assert_eq!(revenue, vec![10000.0, 0.0, 20000.0]);
    assert_eq!(series.total_revenue, 30000.0);
    assert_eq!(series.total_tickets, 2);
    assert_eq!(series.buckets[0].label, "1 thg 10");
}

#[tokio::test]
async fn test_reversed_dates_are_swapped() {
    let api = RevenueApi::new(
        Arc::new(InMemorySource::default()),
        memory_config(&utc_config()),
    );
    let series = api
        .get_revenue_by_date_range("2025-10-03", "2025-10-01")
        .await
        .unwrap();
    assert_eq!(series.buckets.len(), 3);
    assert_eq!(series.buckets[0].date_key, "2025-10-01");
}

#[tokio::test]
async fn test_invalid_date_is_invalid_input() {
    let api = RevenueApi::new(
        Arc::new(InMemorySource::default()),
        memory_config(&utc_config()),
    );
    let err = api
        .get_revenue_by_date_range("01/10/2025", "2025-10-03")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn test_timezone_and_locale_from_config() {
    // 2025-05-01 20:00 UTC = 2025-05-02 03:00 +07:00
    let source = InMemorySource {
        tickets: vec![ticket(
            "T1",
            "daily1",
            TicketStatus::Used,
            Some(40000.0),
            Some(utc(2025, 5, 1, 20)),
        )],
        ..Default::default()
    };
    let config = memory_config(&[
        (config_keys::REVENUE_TIMEZONE, "+07:00"),
        (config_keys::REVENUE_LABEL_LOCALE, "en"),
    ]);
    let api = RevenueApi::new(Arc::new(source), config);

    let series = api
        .get_revenue_by_date_range("2025-05-01", "2025-05-02")
        .await
        .unwrap();
    assert_eq!(series.buckets[0].revenue, 0.0);
    assert_eq!(series.buckets[1].revenue, 40000.0);
    assert_eq!(series.buckets[1].label, "May 2");
}

#[tokio::test]
async fn test_window_defaults_to_config() {
    let source = InMemorySource {
        tickets: vec![ticket(
            "T1",
            "daily1",
            TicketStatus::Active,
            Some(12000.0),
            Some(Utc::now()),
        )],
        ..Default::default()
    };
    let mut pairs = utc_config();
    pairs.push((config_keys::REVENUE_DEFAULT_WINDOW_DAYS, "14"));
    let api = RevenueApi::new(Arc::new(source), memory_config(&pairs));

    let series = api.get_revenue_by_window(None).await.unwrap();
    assert_eq!(series.granularity, Granularity::Daily);
    assert_eq!(series.buckets.len(), 14);
    assert_eq!(series.buckets.last().unwrap().revenue, 12000.0);

    let explicit = api.get_revenue_by_window(Some(3)).await.unwrap();
    assert_eq!(explicit.buckets.len(), 3);
}

#[tokio::test]
async fn test_oversized_window_is_rejected() {
    let api = RevenueApi::new(
        Arc::new(InMemorySource::default()),
        memory_config(&utc_config()),
    );

    let err = api.get_revenue_by_window(Some(u32::MAX)).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(ref msg) if msg.contains("window_days")));
    assert!(matches!(
        api.get_revenue_by_window(Some(MAX_WINDOW_DAYS + 1)).await,
        Err(ApiError::InvalidInput(_))
    ));

    let widest = api.get_revenue_by_window(Some(MAX_WINDOW_DAYS)).await.unwrap();
    assert_eq!(widest.buckets.len(), MAX_WINDOW_DAYS as usize);
}

#[tokio::test]
async fn test_configured_window_above_cap_falls_back() {
    let mut pairs = utc_config();
    pairs.push((config_keys::REVENUE_DEFAULT_WINDOW_DAYS, "4294967295"));
    let api = RevenueApi::new(Arc::new(InMemorySource::default()), memory_config(&pairs));

    let series = api.get_revenue_by_window(None).await.unwrap();
    assert_eq!(series.buckets.len(), DEFAULT_WINDOW_DAYS as usize);
}

#[tokio::test]
async fn test_current_week_and_month_end_today() {
    let api = RevenueApi::new(
        Arc::new(InMemorySource::default()),
        memory_config(&utc_config()),
    );
    let today = Utc::now().date_naive();

    let week = api.get_current_week().await.unwrap();
    assert_eq!(week.end, today);
    assert!(week.buckets.len() <= 7);

    let month = api.get_current_month().await.unwrap();
    assert_eq!(month.end, today);
    assert_eq!(month.granularity, Granularity::Daily);
}

#[tokio::test]
async fn test_summary_and_source_failure() {
    let source = InMemorySource {
        tickets: vec![
            ticket("T1", "daily1", TicketStatus::Used, Some(10000.0), None),
            ticket("T2", "monthly", TicketStatus::Unused, None, None),
        ],
        ..Default::default()
    };
    let api = RevenueApi::new(Arc::new(source), memory_config(&[]));
    let summary = api.get_summary().await.unwrap();
    assert_eq!(summary.total_revenue, 10000.0);
    assert_eq!(summary.total_count, 2);

    let failing = RevenueApi::new(Arc::new(FailingSource::default()), memory_config(&[]));
    let err = failing.get_summary().await.unwrap_err();
    assert!(matches!(err, ApiError::DatabaseError(_)));
    assert!(failing
        .get_revenue_by_date_range("2025-10-01", "2025-10-03")
        .await
        .is_err());
}
