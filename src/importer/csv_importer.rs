// ==========================================
// 地铁票务管理后台 - CSV 导入器
// ==========================================
// 职责: 车站 / 已售车票 CSV → 领域记录 → 仓储写入
// 约定:
// - 按表头取值,列名与值均去除首尾空白
// - 允许行长度不一致,完全空白的行跳过
// - 单行错误只跳过该行并记录到 ImportSummary.errors
// ==========================================

use crate::domain::station::Station;
use crate::domain::ticket::Ticket;
use crate::domain::types::{StationStatus, StationType, TicketStatus};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::station_repo::StationRepository;
use crate::repository::ticket_repo::UserTicketRepository;
use chrono::{DateTime, NaiveDateTime, Utc};
use csv::ReaderBuilder;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::instrument;

/// 一行原始数据 (行号, 列名 → 值)
pub type RawRecord = (usize, HashMap<String, String>);

// ==========================================
// ImportSummary - 导入结果汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,   // 非空数据行数
    pub imported: usize,     // 成功写入
    pub skipped: usize,      // 因行错误跳过
    pub errors: Vec<String>, // 行级错误描述 (含行号)
}

// ==========================================
// CSV 解析
// ==========================================

/// 读取 CSV 文件为按表头索引的原始行
///
/// 行号从 2 开始 (第 1 行为表头)
pub fn parse_csv_records(path: &Path) -> ImportResult<Vec<RawRecord>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    if let Some(ext) = path.extension() {
        if !ext.eq_ignore_ascii_case("csv") {
            return Err(ImportError::UnsupportedFormat(
                ext.to_string_lossy().to_string(),
            ));
        }
    }

    let file = File::open(path).map_err(|e| ImportError::CsvParseError(e.to_string()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let row: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.trim().to_string()))
            .collect();

        if row.values().all(|v| v.is_empty()) {
            continue;
        }
        records.push((idx + 2, row));
    }

    Ok(records)
}

fn require_columns(records: &[RawRecord], columns: &[&str]) -> ImportResult<()> {
    let Some((_, first)) = records.first() else {
        return Ok(());
    };
    for column in columns {
        if !first.contains_key(*column) {
            return Err(ImportError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

// ===== 字段读取辅助 =====

fn optional_text(row: &HashMap<String, String>, field: &str) -> Option<String> {
    row.get(field).filter(|v| !v.is_empty()).cloned()
}

fn text_or_empty(row: &HashMap<String, String>, field: &str) -> String {
    optional_text(row, field).unwrap_or_default()
}

fn required_text(line: usize, row: &HashMap<String, String>, field: &str) -> ImportResult<String> {
    optional_text(row, field).ok_or_else(|| ImportError::RequiredFieldMissing {
        row: line,
        field: field.to_string(),
    })
}

fn optional_f64(line: usize, row: &HashMap<String, String>, field: &str) -> ImportResult<Option<f64>> {
    optional_text(row, field)
        .map(|raw| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ImportError::TypeConversionError {
                    row: line,
                    field: field.to_string(),
                    message: format!("无法解析为数字: {}", raw),
                })
        })
        .transpose()
}

fn optional_i64(line: usize, row: &HashMap<String, String>, field: &str) -> ImportResult<Option<i64>> {
    optional_text(row, field)
        .map(|raw| {
            raw.parse::<i64>().map_err(|e| ImportError::TypeConversionError {
                row: line,
                field: field.to_string(),
                message: format!("{} ({})", e, raw),
            })
        })
        .transpose()
}

/// 解析购票时间: RFC3339,或不带时区的 "YYYY-MM-DD HH:MM:SS" (按 UTC)
pub fn parse_import_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

// ==========================================
// 行 → 领域记录
// ==========================================

/// 车站行
///
/// 必填: station_name, order_index
pub fn station_from_row(line: usize, row: &HashMap<String, String>) -> ImportResult<Station> {
    let station_name = required_text(line, row, "station_name")?;
    let order_index = optional_i64(line, row, "order_index")?.ok_or_else(|| {
        ImportError::RequiredFieldMissing {
            row: line,
            field: "order_index".to_string(),
        }
    })?;
    let latitude = optional_f64(line, row, "latitude")?;
    let longitude = optional_f64(line, row, "longitude")?;

    Ok(Station {
        id: text_or_empty(row, "id"),
        code: text_or_empty(row, "code"),
        station_name,
        order_index,
        zone: text_or_empty(row, "zone"),
        status: StationStatus::from_str(&text_or_empty(row, "status")),
        station_type: StationType::from_str(&text_or_empty(row, "station_type")),
        location: latitude.zip(longitude),
    })
}

/// 已售车票行
///
/// 必填: ticket_type; price / booking_time 允许为空
pub fn ticket_from_row(line: usize, row: &HashMap<String, String>) -> ImportResult<Ticket> {
    let ticket_type = required_text(line, row, "ticket_type")?;
    let price = optional_f64(line, row, "price")?;
    let booking_time = match optional_text(row, "booking_time") {
        Some(raw) => Some(parse_import_time(&raw).ok_or_else(|| ImportError::DateFormatError {
            row: line,
            field: "booking_time".to_string(),
            value: raw.clone(),
        })?),
        None => None,
    };

    Ok(Ticket {
        id: text_or_empty(row, "id"),
        user_id: text_or_empty(row, "user_id"),
        ticket_name: optional_text(row, "ticket_name").unwrap_or_else(|| ticket_type.clone()),
        ticket_type,
        status: TicketStatus::from_str(
            &optional_text(row, "status").unwrap_or_else(|| "unused".to_string()),
        ),
        price,
        booking_time,
        duration_days: optional_i64(line, row, "duration_days")?.unwrap_or(0),
        start_station_code: optional_text(row, "start_station_code"),
        end_station_code: optional_text(row, "end_station_code"),
    })
}

// ==========================================
// CsvImporter - CSV 导入器
// ==========================================
pub struct CsvImporter {
    station_repo: StationRepository,
    ticket_repo: UserTicketRepository,
}

impl CsvImporter {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            station_repo: StationRepository::new(conn.clone()),
            ticket_repo: UserTicketRepository::new(conn),
        }
    }

    /// 导入车站 CSV
    ///
    /// # 返回
    /// - Ok(ImportSummary): 行错误计入 errors,不中断导入
    /// - Err(ImportError): 文件级错误或写库失败
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn import_stations(&self, path: &Path) -> ImportResult<ImportSummary> {
        let records = parse_csv_records(path)?;
        require_columns(&records, &["station_name", "order_index"])?;

        let mut summary = ImportSummary {
            total_rows: records.len(),
            ..Default::default()
        };
        for (line, row) in &records {
            match station_from_row(*line, row) {
                Ok(station) => {
                    self.station_repo.insert(&station)?;
                    summary.imported += 1;
                }
                Err(e) => {
                    tracing::debug!(line, error = %e, "车站行跳过");
                    summary.skipped += 1;
                    summary.errors.push(e.to_string());
                }
            }
        }

        tracing::info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "车站导入完成"
        );
        Ok(summary)
    }

    /// 导入已售车票 CSV (有效行单事务写入)
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn import_tickets(&self, path: &Path) -> ImportResult<ImportSummary> {
        let records = parse_csv_records(path)?;
        require_columns(&records, &["ticket_type"])?;

        let mut summary = ImportSummary {
            total_rows: records.len(),
            ..Default::default()
        };
        let mut tickets = Vec::with_capacity(records.len());
        for (line, row) in &records {
            match ticket_from_row(*line, row) {
                Ok(ticket) => tickets.push(ticket),
                Err(e) => {
                    tracing::debug!(line, error = %e, "车票行跳过");
                    summary.skipped += 1;
                    summary.errors.push(e.to_string());
                }
            }
        }

        summary.imported = self.ticket_repo.batch_insert(&tickets)?;
        tracing::info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "车票导入完成"
        );
        Ok(summary)
    }
}
