// ==========================================
// 地铁票务管理后台 - 导入 API
// ==========================================
// 职责: 封装车站 / 已售车票 CSV 导入
// ==========================================

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::importer::csv_importer::{CsvImporter, ImportSummary};

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 导入汇总
    pub summary: ImportSummary,
    /// 导入耗时（毫秒）
    pub elapsed_ms: i64,
}

/// 导入API
pub struct ImportApi {
    importer: Arc<CsvImporter>,
}

impl ImportApi {
    pub fn new(importer: Arc<CsvImporter>) -> Self {
        Self { importer }
    }

    /// 导入车站 CSV
    pub fn import_stations(&self, file_path: &str) -> ApiResult<ImportApiResponse> {
        let path = validate_path(file_path)?;
        let started = Instant::now();
        let summary = self.importer.import_stations(path)?;
        Ok(ImportApiResponse {
            summary,
            elapsed_ms: started.elapsed().as_millis() as i64,
        })
    }

    /// 导入已售车票 CSV
    pub fn import_tickets(&self, file_path: &str) -> ApiResult<ImportApiResponse> {
        let path = validate_path(file_path)?;
        let started = Instant::now();
        let summary = self.importer.import_tickets(path)?;
        Ok(ImportApiResponse {
            summary,
            elapsed_ms: started.elapsed().as_millis() as i64,
        })
    }
}

fn validate_path(file_path: &str) -> ApiResult<&Path> {
    let trimmed = file_path.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput("文件路径不能为空".to_string()));
    }
    Ok(Path::new(trimmed))
}
