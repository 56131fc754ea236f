// ==========================================
// Repository 集成测试
// ==========================================
// 测试范围:
// 1. 车站 / 车票 / 票种 / 用户 CRUD; 非数值票价按缺失读取
// 2. 票价规则: 当前规则、更新不存在时报 NotFound、保存即覆盖或新建
// 3. SqliteRecordSource 读取
// ==========================================


use metro_fare_revenue::domain::{PriceRule, TicketStatus, TicketType, TicketTypeStatus};
use metro_fare_revenue::engine::RevenueAggregator;
use metro_fare_revenue::repository::{
    PriceSettingRepository, RecordSource, RepositoryError, SqliteRecordSource, StationRepository,
    TicketTypeRepository, UserRepository, UserTicketRepository,
};
use test_helpers::{create_test_db, shared_conn, station, ticket, user, utc};

#[test]
fn test_station_crud_and_ordering() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = StationRepository::new(shared_conn(&db_path));

    repo.insert(&station("c", 2)).unwrap();
    repo.insert(&station("a", 0)).unwrap();
    let generated = repo.insert(&station("", 1)).unwrap();
    assert!(!generated.is_empty());

    let all = repo.list_all().unwrap();
    let orders: Vec<i64> = all.iter().map(|s| s.order_index).collect();
    assert_eq!(orders, vec![0, 1, 2]);

    let mut a = repo.find_by_id("a").unwrap().unwrap();
    a.station_name = "Bến Thành".to_string();
    a.location = Some((10.77, 106.70));
    repo.update(&a).unwrap();
    let a = repo.find_by_id("a").unwrap().unwrap();
    assert_eq!(a.station_name, "Bến Thành");
    assert_eq!(a.location, Some((10.77, 106.70)));

    repo.delete("c").unwrap();
    assert_eq!(repo.count().unwrap(), 2);
    assert!(matches!(repo.delete("c"), Err(RepositoryError::NotFound { .. })));
}

#[test]
fn test_ticket_optional_fields_round_trip() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = UserTicketRepository::new(shared_conn(&db_path));

    let tickets = vec![
        ticket("T1", "daily1", TicketStatus::Unused, Some(40000.0), Some(utc(2025, 10, 12, 3))),
        ticket("T2", "monthly", TicketStatus::Other("lost".to_string()), None, None),
    ];
    assert_eq!(repo.batch_insert(&tickets).unwrap(), 2);

    let t2 = repo.find_by_id("T2").unwrap().unwrap();
    assert_eq!(t2.price, None);
    assert_eq!(t2.booking_time, None);
    assert_eq!(t2.status, TicketStatus::Other("lost".to_string()));

    repo.update_status("T1", &TicketStatus::Used).unwrap();
    let used = repo.list_by_status(&TicketStatus::Used).unwrap();
    assert_eq!(used.len(), 1);
    assert_eq!(used[0].booking_time, Some(utc(2025, 10, 12, 3)));
}

#[test]
fn test_unparseable_booking_time_reads_as_missing() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    conn.lock()
        .unwrap()
        .execute(
            "INSERT INTO user_tickets (id, ticket_type, price, booking_time) VALUES ('T9', 'daily1', 1000, 'hôm qua')",
            [],
        )
        .unwrap();

    let repo = UserTicketRepository::new(conn);
    let t = repo.find_by_id("T9").unwrap().unwrap();
    assert_eq!(t.booking_time, None);
    assert_eq!(t.price, Some(1000.0));
}

#[test]
fn test_non_numeric_price_reads_as_missing() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    conn.lock()
        .unwrap()
        .execute_batch(
            r#"
            INSERT INTO user_tickets (id, ticket_type, status, price, booking_time)
                VALUES ('T1', 'daily1', 'used', 40000, '2025-10-12T03:00:00+00:00');
            INSERT INTO user_tickets (id, ticket_type, status, price, booking_time)
                VALUES ('T2', 'daily1', 'used', 'abc', '2025-10-12T04:00:00+00:00');
            INSERT INTO user_tickets (id, ticket_type, status, price, booking_time)
                VALUES ('T3', 'monthly', 'unused', 15000, NULL);
            "#,
        )
        .unwrap();

    let repo = UserTicketRepository::new(conn);
    let tickets = repo.list_all().unwrap();
    assert_eq!(tickets.len(), 3);

    let t2 = repo.find_by_id("T2").unwrap().unwrap();
    assert_eq!(t2.price, None);
    assert_eq!(t2.booking_time, Some(utc(2025, 10, 12, 4)));
    let t3 = repo.find_by_id("T3").unwrap().unwrap();
    assert_eq!(t3.price, Some(15000.0));
    assert_eq!(t3.booking_time, None);

    let summary = RevenueAggregator::default().summarize(&tickets);
    assert_eq!(summary.total_count, 3);
    assert_eq!(summary.total_revenue, 55000.0);
}

#[test]
fn test_user_crud_and_ordering() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = UserRepository::new(shared_conn(&db_path));

    repo.insert(&user("U1", Some("lannt"), Some("lan@example.vn"), Some(utc(2025, 9, 1, 8))))
        .unwrap();
    repo.insert(&user("U2", None, Some("minh@example.vn"), Some(utc(2025, 10, 1, 8))))
        .unwrap();
    let generated = repo.insert(&user("", Some("an"), None, None)).unwrap();
    assert!(!generated.is_empty());

    // 未给注册时间的用户按当前时间写入,排最前
    let ids: Vec<String> = repo.list_all().unwrap().into_iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![generated.clone(), "U2".to_string(), "U1".to_string()]);

    let mut u1 = repo.find_by_id("U1").unwrap().unwrap();
    u1.name = Some("Nguyễn Thị Lan".to_string());
    u1.role = "admin".to_string();
    u1.created_at = None;
    repo.update(&u1).unwrap();
    let u1 = repo.find_by_id("U1").unwrap().unwrap();
    assert_eq!(u1.name.as_deref(), Some("Nguyễn Thị Lan"));
    assert_eq!(u1.role, "admin");
    assert_eq!(u1.created_at, Some(utc(2025, 9, 1, 8)));

    repo.delete("U2").unwrap();
    assert_eq!(repo.count().unwrap(), 2);
    assert!(matches!(repo.delete("U2"), Err(RepositoryError::NotFound { .. })));
    assert!(matches!(
        repo.update(&user("U404", None, None, None)),
        Err(RepositoryError::NotFound { .. })
    ));
}

#[test]
fn test_price_setting_update_without_rule_is_not_found() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = PriceSettingRepository::new(shared_conn(&db_path));

    assert_eq!(repo.get_current().unwrap(), None);
    let err = repo.update_current(&PriceRule::default()).unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[test]
fn test_price_setting_save_creates_then_overwrites() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = PriceSettingRepository::new(shared_conn(&db_path));

    let first_id = repo.save(&PriceRule::default()).unwrap();
    let second_id = repo
        .save(&PriceRule::new(5, 8000.0, 1500.0).with_name("Giá mới"))
        .unwrap();
    assert_eq!(first_id, second_id);

    let current = repo.get_current().unwrap().unwrap();
    assert_eq!(current.id.as_deref(), Some(first_id.as_str()));
    assert_eq!(current.base_station_count, 5);
    assert_eq!(current.base_price, 8000.0);
    assert_eq!(current.name, "Giá mới");
    assert!(current.updated_at.is_some());
}

#[test]
fn test_negative_stored_base_station_count_is_field_error() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    conn.lock()
        .unwrap()
        .execute(
            "INSERT INTO price_setting (id, name, base_station_count, base_price, extra_price_per_station)
             VALUES ('P1', '', -2, 6000, 1000)",
            [],
        )
        .unwrap();

    let repo = PriceSettingRepository::new(conn);
    assert!(matches!(
        repo.get_current(),
        Err(RepositoryError::FieldValueError { .. })
    ));
}

#[test]
fn test_ticket_type_crud() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let repo = TicketTypeRepository::new(shared_conn(&db_path));

    let mut item = TicketType {
        id: String::new(),
        ticket_name: "Vé 1 Ngày".to_string(),
        description: "Đi không giới hạn trong ngày".to_string(),
        price: 40000.0,
        duration_days: 1,
        type_key: "daily1".to_string(),
        categories: "all".to_string(),
        status: TicketTypeStatus::Active,
        note: None,
    };
    item.id = repo.insert(&item).unwrap();

    item.status = TicketTypeStatus::Inactive;
    item.note = Some("Tạm ngưng".to_string());
    repo.update(&item).unwrap();

    let all = repo.list_all().unwrap();
    assert_eq!(all, vec![item.clone()]);
    assert_eq!(repo.count().unwrap(), 1);

    repo.delete(&item.id).unwrap();
    assert_eq!(repo.count().unwrap(), 0);
}

#[tokio::test]
async fn test_sqlite_record_source_reads_all_collections() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = shared_conn(&db_path);
    StationRepository::new(conn.clone())
        .insert(&station("a", 0))
        .unwrap();
    UserTicketRepository::new(conn.clone())
        .insert(&ticket("T1", "daily1", TicketStatus::Unused, Some(1.0), None))
        .unwrap();
    PriceSettingRepository::new(conn.clone())
        .insert(&PriceRule::default())
        .unwrap();
    UserRepository::new(conn.clone())
        .insert(&user("U1", Some("lannt"), None, Some(utc(2025, 10, 1, 8))))
        .unwrap();

    let source = SqliteRecordSource::new(conn);
    assert_eq!(source.fetch_stations().await.unwrap().len(), 1);
    assert_eq!(source.fetch_tickets().await.unwrap().len(), 1);
    assert!(source.fetch_price_rule().await.unwrap().is_some());
    assert!(source.fetch_ticket_types().await.unwrap().is_empty());
    assert_eq!(source.fetch_users().await.unwrap()[0].id, "U1");
}
