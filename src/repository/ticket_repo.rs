// ==========================================
// 地铁票务管理后台 - 已售车票数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: booking_time 以 RFC3339 文本存储,无法解析时按缺失处理
// ==========================================

use crate::domain::ticket::Ticket;
use crate::domain::types::TicketStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const TICKET_COLUMNS: &str = r#"
    id, user_id, ticket_name, ticket_type, status, price, booking_time,
    duration_days, start_station_code, end_station_code
"#;

// ==========================================
// UserTicketRepository - 已售车票仓储
// ==========================================

/// 已售车票仓储
/// 职责: 管理 user_tickets 表的 CRUD 操作
pub struct UserTicketRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserTicketRepository {
    /// 从共享连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部车票 (按购票时间倒序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Ticket>> {
        self.query_tickets(
            &format!(
                "SELECT {} FROM user_tickets ORDER BY booking_time DESC, id ASC",
                TICKET_COLUMNS
            ),
            params![],
        )
    }

    /// 按用户查询车票 (按购票时间倒序)
    pub fn list_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Ticket>> {
        self.query_tickets(
            &format!(
                "SELECT {} FROM user_tickets WHERE user_id = ?1 ORDER BY booking_time DESC, id ASC",
                TICKET_COLUMNS
            ),
            params![user_id],
        )
    }

    /// 按状态查询车票 (按购票时间倒序)
    pub fn list_by_status(&self, status: &TicketStatus) -> RepositoryResult<Vec<Ticket>> {
        self.query_tickets(
            &format!(
                "SELECT {} FROM user_tickets WHERE status = ?1 ORDER BY booking_time DESC, id ASC",
                TICKET_COLUMNS
            ),
            params![status.as_str()],
        )
    }

    /// 按ID查询车票
    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Ticket>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM user_tickets WHERE id = ?1", TICKET_COLUMNS);
        let ticket = conn.query_row(&sql, params![id], map_ticket_row).optional()?;
        Ok(ticket)
    }

    /// 新增车票 (id 为空时生成 UUID)
    pub fn insert(&self, ticket: &Ticket) -> RepositoryResult<String> {
        let id = if ticket.id.trim().is_empty() {
            uuid::Uuid::new_v4().to_string()
        } else {
            ticket.id.clone()
        };

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO user_tickets (
                id, user_id, ticket_name, ticket_type, status, price, booking_time,
                duration_days, start_station_code, end_station_code
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                id,
                ticket.user_id,
                ticket.ticket_name,
                ticket.ticket_type,
                ticket.status.as_str(),
                ticket.price,
                ticket.booking_time.map(|t| t.to_rfc3339()),
                ticket.duration_days,
                ticket.start_station_code,
                ticket.end_station_code,
            ],
        )?;
        Ok(id)
    }

    /// 批量新增车票 (单事务)
    ///
    /// # 返回
    /// - Ok(usize): 写入条数
    pub fn batch_insert(&self, tickets: &[Ticket]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO user_tickets (
                    id, user_id, ticket_name, ticket_type, status, price, booking_time,
                    duration_days, start_station_code, end_station_code
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )?;
            for ticket in tickets {
                let id = if ticket.id.trim().is_empty() {
                    uuid::Uuid::new_v4().to_string()
                } else {
                    ticket.id.clone()
                };
                stmt.execute(params![
                    id,
                    ticket.user_id,
                    ticket.ticket_name,
                    ticket.ticket_type,
                    ticket.status.as_str(),
                    ticket.price,
                    ticket.booking_time.map(|t| t.to_rfc3339()),
                    ticket.duration_days,
                    ticket.start_station_code,
                    ticket.end_station_code,
                ])?;
            }
        }
        tx.commit()?;
        Ok(tickets.len())
    }

    /// 更新车票状态
    pub fn update_status(&self, id: &str, status: &TicketStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE user_tickets SET status = ?2 WHERE id = ?1",
            params![id, status.as_str()],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "UserTicket".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 删除车票
    pub fn delete(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM user_tickets WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "UserTicket".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn query_tickets(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> RepositoryResult<Vec<Ticket>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let tickets = stmt
            .query_map(params, map_ticket_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tickets)
    }
}

/// 解析存储的购票时间 (RFC3339),失败按缺失处理
pub fn parse_booking_time(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(raw, error = %e, "booking_time 无法解析,按缺失处理");
            None
        }
    }
}

/// 解析存储的票价,非数值按缺失处理
pub fn parse_price(value: Value) -> Option<f64> {
    match value {
        Value::Integer(v) => Some(v as f64),
        Value::Real(v) => Some(v),
        Value::Null => None,
        other => {
            tracing::debug!(data_type = ?other.data_type(), "price 非数值,按缺失处理");
            None
        }
    }
}

fn booking_time_from_value(value: Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Text(raw) => parse_booking_time(&raw),
        Value::Null => None,
        other => {
            tracing::debug!(data_type = ?other.data_type(), "booking_time 非文本,按缺失处理");
            None
        }
    }
}

fn map_ticket_row(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        id: row.get(0)?,
        user_id: row.get(1)?,
        ticket_name: row.get(2)?,
        ticket_type: row.get(3)?,
        status: TicketStatus::from_str(&row.get::<_, String>(4)?),
        price: parse_price(row.get(5)?),
        booking_time: booking_time_from_value(row.get(6)?),
        duration_days: match row.get::<_, Value>(7)? {
            Value::Integer(v) => v,
            _ => 0,
        },
        start_station_code: row.get(8)?,
        end_station_code: row.get(9)?,
    })
}
