// ==========================================
// 地铁票务管理后台 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 计价引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FareError {
    /// 票价规则参数非法 (负数或非有限数)
    #[error("票价规则配置错误 (field={field}): {message}")]
    Configuration { field: String, message: String },

    #[error("车站不存在: {0}")]
    StationNotFound(String),
}

impl FareError {
    pub fn configuration(field: &str, message: impl Into<String>) -> Self {
        FareError::Configuration {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result 类型别名
pub type FareResult<T> = Result<T, FareError>;
