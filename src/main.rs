// ==========================================
// 地铁票务管理后台 - 命令行入口
// ==========================================
// 用法: metro-fare-revenue [DB_PATH]
// 输出: 仪表盘 (总览/图表/近期动态) + 默认窗口营收序列 (JSON, stdout)
// ==========================================

use anyhow::Context;
use metro_fare_revenue::app::{get_default_db_path, AppState};
use metro_fare_revenue::logging;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", metro_fare_revenue::APP_NAME, metro_fare_revenue::VERSION);
    tracing::info!("==================================================");

    let db_path = std::env::args()
        .nth(1)
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    let overview = state
        .dashboard_api
        .get_overview()
        .await
        .context("仪表盘统计失败")?;
    let revenue = state
        .revenue_api
        .get_revenue_by_window(None)
        .await
        .context("近期营收统计失败")?;

    let report = json!({
        "dashboard": overview,
        "revenue": revenue,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
