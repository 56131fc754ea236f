// ==========================================
// 地铁票务管理后台 - 导入层
// ==========================================
// 职责: 外部 CSV 数据导入 (车站 / 已售车票)
// ==========================================

pub mod csv_importer;
pub mod error;

// 重导出核心类型
pub use csv_importer::{parse_csv_records, CsvImporter, ImportSummary};
pub use error::{ImportError, ImportResult};
