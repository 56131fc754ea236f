// ==========================================
// 地铁票务管理后台 - 车站数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::station::Station;
use crate::domain::types::{StationStatus, StationType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const STATION_COLUMNS: &str = r#"
    id, code, station_name, order_index, zone, status, station_type, latitude, longitude
"#;

// ==========================================
// StationRepository - 车站仓储
// ==========================================

/// 车站仓储
/// 职责: 管理 stations 表的 CRUD 操作
pub struct StationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StationRepository {
    /// 从共享连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部车站 (按线路顺序升序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Station>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM stations ORDER BY order_index ASC, id ASC",
            STATION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let stations = stmt
            .query_map([], map_station_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stations)
    }

    /// 按ID查询车站
    ///
    /// # 返回
    /// - Ok(Some(Station)): 找到车站
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Station>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM stations WHERE id = ?1", STATION_COLUMNS);
        let station = conn
            .query_row(&sql, params![id], map_station_row)
            .optional()?;
        Ok(station)
    }

    /// 新增车站
    ///
    /// id 为空时生成 UUID
    ///
    /// # 返回
    /// - Ok(String): 车站ID
    pub fn insert(&self, station: &Station) -> RepositoryResult<String> {
        let id = if station.id.trim().is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            station.id.clone()
        };

        let conn = self.get_conn()?;
        let (latitude, longitude) = split_location(station.location);
        conn.execute(
            r#"
            INSERT INTO stations (
                id, code, station_name, order_index, zone, status, station_type, latitude, longitude
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                id,
                station.code,
                station.station_name,
                station.order_index,
                station.zone,
                station.status.to_db_str(),
                station.station_type.to_db_str(),
                latitude,
                longitude,
            ],
        )?;
        Ok(id)
    }

    /// 更新车站
    pub fn update(&self, station: &Station) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let (latitude, longitude) = split_location(station.location);
        let affected = conn.execute(
            r#"
            UPDATE stations SET
                code = ?2, station_name = ?3, order_index = ?4, zone = ?5,
                status = ?6, station_type = ?7, latitude = ?8, longitude = ?9
            WHERE id = ?1
            "#,
            params![
                station.id,
                station.code,
                station.station_name,
                station.order_index,
                station.zone,
                station.status.to_db_str(),
                station.station_type.to_db_str(),
                latitude,
                longitude,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Station".to_string(),
                id: station.id.clone(),
            });
        }
        Ok(())
    }

    /// 删除车站
    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM stations WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Station".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 车站总数
    pub fn count(&self) -> RepositoryResult<u64> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM stations", [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }
}

fn split_location(location: Option<(f64, f64)>) -> (Option<f64>, Option<f64>) {
    match location {
        Some((lat, lng)) => (Some(lat), Some(lng)),
        None => (None, None),
    }
}

fn map_station_row(row: &Row<'_>) -> rusqlite::Result<Station> {
    let latitude: Option<f64> = row.get(7)?;
    let longitude: Option<f64> = row.get(8)?;
    Ok(Station {
        id: row.get(0)?,
        code: row.get(1)?,
        station_name: row.get(2)?,
        order_index: row.get(3)?,
        zone: row.get(4)?,
        status: StationStatus::from_str(&row.get::<_, String>(5)?),
        station_type: StationType::from_str(&row.get::<_, String>(6)?),
        location: latitude.zip(longitude),
    })
}
