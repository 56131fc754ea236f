// ==========================================
// 地铁票务管理后台 - 用户领域模型
// ==========================================
// 对齐: users 集合 (注册用户) / 车票列表的用户信息联表
// ==========================================

use crate::domain::ticket::Ticket;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 默认角色
pub const DEFAULT_USER_ROLE: &str = "user";

// ==========================================
// User - 注册用户
// ==========================================
// 名称类字段均可缺失,显示名按 username → name → 邮箱前缀 依次回退
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    // ===== 主键 =====
    pub id: String,

    // ===== 基础信息 =====
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phonenumber: Option<String>,
    pub role: String,

    // ===== 时间 =====
    pub created_at: Option<DateTime<Utc>>, // 注册时间
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
            name: None,
            email: None,
            phonenumber: None,
            role: DEFAULT_USER_ROLE.to_string(),
            created_at: None,
        }
    }

    /// 显示名 (username → name → 邮箱 @ 前部分),均为空时 None
    pub fn display_name(&self) -> Option<String> {
        non_empty(self.username.as_deref())
            .or_else(|| non_empty(self.name.as_deref()))
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|email| non_empty(email.split('@').next()))
            })
            .map(str::to_string)
    }

    /// 邮箱 (缺失为空串)
    pub fn email_or_empty(&self) -> String {
        self.email.clone().unwrap_or_default()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ==========================================
// UserTicketView - 带用户信息的车票
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTicketView {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub user_name: String,  // 购票用户显示名
    pub user_email: String, // 购票用户邮箱 (缺失为空串)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback_chain() {
        let mut user = User::new("U1");
        assert_eq!(user.display_name(), None);

        user.email = Some("lan.nguyen@example.vn".to_string());
        assert_eq!(user.display_name().as_deref(), Some("lan.nguyen"));

        user.name = Some("Nguyễn Thị Lan".to_string());
        assert_eq!(user.display_name().as_deref(), Some("Nguyễn Thị Lan"));

        user.username = Some("  ".to_string());
        assert_eq!(user.display_name().as_deref(), Some("Nguyễn Thị Lan"));

        user.username = Some("lannt".to_string());
        assert_eq!(user.display_name().as_deref(), Some("lannt"));
    }

    #[test]
    fn test_email_without_local_part_is_not_a_name() {
        let mut user = User::new("U2");
        user.email = Some("@example.vn".to_string());
        assert_eq!(user.display_name(), None);
        assert_eq!(user.email_or_empty(), "@example.vn");
    }
}
