// ==========================================
// CSV 导入集成测试
// ==========================================
// 测试范围:
// 1. 车站导入 + 行级错误汇总
// 2. 车票导入后经 AppState 统计 (端到端)
// 3. 缺少必需列
// ==========================================


use std::io::Write;

use metro_fare_revenue::api::ApiError;
use metro_fare_revenue::app::AppState;
use metro_fare_revenue::config::config_keys;
use metro_fare_revenue::domain::Granularity;
use metro_fare_revenue::importer::ImportError;
use tempfile::{Builder, NamedTempFile};
use test_helpers::create_test_db;

fn csv_file(content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_import_stations_with_row_errors() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).unwrap();

    let file = csv_file(
        "id,code,station_name,order_index,zone,status,station_type\n\
         S1,BT,Bến Thành,0,Q1,active,underground\n\
         S2,NH,Nhà hát Thành phố,x,Q1,active,underground\n\
         S3,BS,Ba Son,2,Q1,maintenance,underground\n\
         S4,VT,,3,BT,active,elevated\n",
    );

    let response = state
        .import_api
        .import_stations(file.path().to_str().unwrap())
        .unwrap();
    let summary = response.summary;
    assert_eq!(summary.total_rows, 4);
    assert_eq!(summary.imported, 2);
    assert_eq!(summary.skipped, 2);
    assert!(summary.errors[0].contains("行 3"));
    assert!(summary.errors[1].contains("station_name"));
}

#[tokio::test]
async fn test_imported_tickets_flow_into_revenue_and_prices() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).unwrap();
    state
        .config_manager
        .set_global_config_value(config_keys::REVENUE_TIMEZONE, "+00:00")
        .unwrap();

    let stations = csv_file("id,station_name,order_index\nA,Ga A,0\nB,Ga B,2\nC,Ga C,5\n");
    state
        .import_api
        .import_stations(stations.path().to_str().unwrap())
        .unwrap();

    let tickets = csv_file(
        "id,user_id,ticket_type,status,price,booking_time\n\
         T1,U1,daily1,used,10000,2025-10-01T09:00:00Z\n\
         T2,U1,daily1,used,20000,2025-10-03 09:00:00\n\
         T3,U2,monthly,unused,,\n\
         T4,U2,monthly,unused,abc,2025-10-02 09:00:00\n",
    );
    let response = state
        .import_api
        .import_tickets(tickets.path().to_str().unwrap())
        .unwrap();
    assert_eq!(response.summary.imported, 3);
    assert_eq!(response.summary.skipped, 1);

    let series = state
        .revenue_api
        .get_revenue_by_date_range("2025-10-01", "2025-10-03")
        .await
        .unwrap();
    assert_eq!(series.granularity, Granularity::Daily);
    let revenue: Vec<f64> = series.buckets.iter().map(|b| b.revenue).collect();
    assert_eq!(revenue, vec![10000.0, 0.0, 20000.0]);

    let stats = state.dashboard_api.get_stats().await.unwrap();
    assert_eq!(stats.total_stations, 3);
    assert_eq!(stats.total_tickets_sold, 3);
    assert_eq!(stats.total_revenue, 30000.0);

    state
        .fare_api
        .save_price_rule(&metro_fare_revenue::api::PriceRuleInput {
            name: "Mặc định".to_string(),
            base_station_count: 3,
            base_price: 6000.0,
            extra_price_per_station: 1000.0,
        })
        .unwrap();
    let matrix = state.fare_api.get_price_matrix().await.unwrap();
    assert_eq!(matrix["C-A"], 8000.0);
}

#[test]
fn test_missing_required_column() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).unwrap();
    let file = csv_file("id,price\nT1,1000\n");

    let err = state
        .import_api
        .import_tickets(file.path().to_str().unwrap())
        .unwrap_err();
    assert!(matches!(err, ApiError::ImportError(ref msg) if msg.contains("ticket_type")));
}

#[test]
fn test_missing_file_is_not_found() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).unwrap();

    let err = state.import_api.import_tickets("/no/such/tickets.csv").unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    assert!(ImportError::FileNotFound("x".to_string())
        .to_string()
        .contains("x"));
}
