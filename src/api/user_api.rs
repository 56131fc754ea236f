// ==========================================
// 地铁票务管理后台 - 用户 API
// ==========================================
// 职责: 用户维护 (增删改查) + 带用户信息的车票列表
// 架构: API 层 → UserRepository (写) / RecordSource (读) → 用户联表
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfigManager;
use crate::domain::user::{User, UserTicketView, DEFAULT_USER_ROLE};
use crate::engine::activity::join_ticket_users;
use crate::repository::record_source::RecordSource;
use crate::repository::user_repo::UserRepository;

/// 用户写入参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInput {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phonenumber: Option<String>,
    pub role: Option<String>,
}

// ==========================================
// UserApi - 用户 API
// ==========================================
pub struct UserApi {
    user_repo: Arc<UserRepository>,
    source: Arc<dyn RecordSource>,
    config_manager: Arc<ConfigManager>,
}

impl UserApi {
    pub fn new(
        user_repo: Arc<UserRepository>,
        source: Arc<dyn RecordSource>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            user_repo,
            source,
            config_manager,
        }
    }

    // ==========================================
    // 用户维护
    // ==========================================

    /// 全部用户 (按注册时间倒序)
    pub fn list_users(&self) -> ApiResult<Vec<User>> {
        Ok(self.user_repo.list_all()?)
    }

    /// 按ID查询用户
    pub fn get_user(&self, id: &str) -> ApiResult<User> {
        self.user_repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("User(id={})不存在", id)))
    }

    /// 新增用户 (注册时间取当前时间)
    pub fn add_user(&self, input: &UserInput) -> ApiResult<User> {
        let mut user = User::new("");
        apply_input(&mut user, input)?;

        let id = self.user_repo.insert(&user)?;
        tracing::info!(user_id = %id, "用户已新增");
        self.get_user(&id)
    }

    /// 更新用户资料 (注册时间不变)
    pub fn update_user(&self, id: &str, input: &UserInput) -> ApiResult<User> {
        let mut user = self.get_user(id)?;
        apply_input(&mut user, input)?;

        self.user_repo.update(&user)?;
        tracing::info!(user_id = %id, "用户已更新");
        Ok(user)
    }

    /// 删除用户 (其车票保留,列表中显示为未知用户)
    pub fn delete_user(&self, id: &str) -> ApiResult<()> {
        self.user_repo.delete(id)?;
        tracing::info!(user_id = %id, "用户已删除");
        Ok(())
    }

    // ==========================================
    // 车票列表
    // ==========================================

    /// 全部车票 + 购票用户信息 (按购票时间倒序)
    pub async fn list_user_tickets(&self) -> ApiResult<Vec<UserTicketView>> {
        let (tickets, users) =
            futures::try_join!(self.source.fetch_tickets(), self.source.fetch_users())?;
        let locale = self.config_manager.get_label_locale()?;
        Ok(join_ticket_users(tickets, &users, &locale))
    }

    /// 指定用户的车票 + 用户信息 (按购票时间倒序)
    pub async fn list_user_tickets_by_user(&self, user_id: &str) -> ApiResult<Vec<UserTicketView>> {
        let (tickets, users) =
            futures::try_join!(self.source.fetch_tickets(), self.source.fetch_users())?;
        let tickets = tickets.into_iter().filter(|t| t.user_id == user_id).collect();
        let locale = self.config_manager.get_label_locale()?;
        Ok(join_ticket_users(tickets, &users, &locale))
    }
}

/// 写入参数 → 用户 (空白字段视为缺失)
fn apply_input(user: &mut User, input: &UserInput) -> ApiResult<()> {
    let email = clean(&input.email);
    if let Some(email) = &email {
        if !email.contains('@') {
            return Err(ApiError::ValidationError(format!("邮箱格式错误: {}", email)));
        }
    }

    user.username = clean(&input.username);
    user.name = clean(&input.name);
    user.email = email;
    user.phonenumber = clean(&input.phonenumber);
    user.role = clean(&input.role).unwrap_or_else(|| DEFAULT_USER_ROLE.to_string());
    Ok(())
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_input_trims_and_defaults_role() {
        let mut user = User::new("U1");
        let input = UserInput {
            username: Some("  lannt ".to_string()),
            name: Some("   ".to_string()),
            email: Some("lan@example.vn".to_string()),
            ..Default::default()
        };
        apply_input(&mut user, &input).unwrap();
        assert_eq!(user.username.as_deref(), Some("lannt"));
        assert_eq!(user.name, None);
        assert_eq!(user.role, "user");
    }

    #[test]
    fn test_apply_input_rejects_malformed_email() {
        let mut user = User::new("U1");
        let input = UserInput {
            email: Some("lan.example.vn".to_string()),
            ..Default::default()
        };
        let err = apply_input(&mut user, &input).unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }
}
