//! User Admin - 用户管理模型
//!
//! 职责：
//! - 加载用户列表
//! - 行内更新用户：fullname 字段出现时先做本地格式校验，
//!   不合格则记录该用户的行内错误且不发请求
//! - 删除用户先询问确认
//!
//! 行内错误按用户 id 记录，互不影响。

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::application::error::ApplicationError;
use crate::application::ports::{AdminGatewayPort, ConfirmationPort, GatewayError, UserPatch};
use crate::domain::user::{validate_fullname, User};

#[derive(Debug, Default)]
struct AdminState {
    users: Vec<User>,
    field_errors: HashMap<i64, String>,
    loading: bool,
    error: Option<String>,
}

/// 用户管理模型
pub struct UserAdmin {
    gateway: Arc<dyn AdminGatewayPort>,
    confirmation: Arc<dyn ConfirmationPort>,
    state: Mutex<AdminState>,
}

impl UserAdmin {
    pub fn new(
        gateway: Arc<dyn AdminGatewayPort>,
        confirmation: Arc<dyn ConfirmationPort>,
    ) -> Self {
        Self {
            gateway,
            confirmation,
            state: Mutex::new(AdminState::default()),
        }
    }

    // ========================================================================
    // 加载
    // ========================================================================

    /// 加载用户列表，清空所有行内错误
    pub async fn load(&self) -> Result<(), ApplicationError> {
        {
            let mut state = self.lock_state();
            state.loading = true;
            state.error = None;
        }
        match self.gateway.list_users().await {
            Ok(users) => {
                tracing::info!(count = users.len(), "user list loaded");
                let mut state = self.lock_state();
                state.loading = false;
                state.users = users;
                state.field_errors.clear();
                Ok(())
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    pub async fn refresh(&self) -> Result<(), ApplicationError> {
        self.load().await
    }

    // ========================================================================
    // 更新与删除
    // ========================================================================

    /// 行内更新用户
    ///
    /// 补丁携带 fullname 时先做本地格式校验（空值视为合法）；
    /// 不合格则记录该用户的行内错误并拒绝，**不发请求**。
    /// 成功后用响应里的用户覆盖持有列表中的对应行，并清除其行内错误。
    pub async fn update_user(&self, id: i64, patch: &UserPatch) -> Result<(), ApplicationError> {
        if let Some(fullname) = &patch.fullname {
            if let Err(message) = validate_fullname(fullname) {
                let mut state = self.lock_state();
                state.field_errors.insert(id, message.to_string());
                return Err(ApplicationError::validation(message));
            }
        }

        match self.gateway.update_user(id, patch).await {
            Ok(updated) => {
                tracing::info!(user_id = id, "user updated");
                let mut state = self.lock_state();
                if let Some(entry) = state.users.iter_mut().find(|u| u.id == id) {
                    *entry = updated;
                }
                state.field_errors.remove(&id);
                Ok(())
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    /// 删除用户：先询问确认；拒绝时返回 Ok(false)
    pub async fn delete_user(&self, id: i64) -> Result<bool, ApplicationError> {
        if !self.confirmation.confirm("Удалить пользователя?").await {
            return Ok(false);
        }
        match self.gateway.delete_user(id).await {
            Ok(()) => {
                tracing::info!(user_id = id, "user deleted");
                let mut state = self.lock_state();
                state.users.retain(|u| u.id != id);
                state.field_errors.remove(&id);
                Ok(true)
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    // ========================================================================
    // 状态读取
    // ========================================================================

    pub fn users(&self) -> Vec<User> {
        self.lock_state().users.clone()
    }

    /// 某个用户的行内错误
    pub fn field_error(&self, id: i64) -> Option<String> {
        self.lock_state().field_errors.get(&id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.lock_state().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock_state().error.clone()
    }

    fn gateway_failure(&self, err: GatewayError) -> ApplicationError {
        let err = ApplicationError::Gateway(err);
        tracing::warn!(error = %err, "user admin request failed");
        let mut state = self.lock_state();
        state.loading = false;
        state.error = Some(err.user_message());
        err
    }

    fn lock_state(&self) -> MutexGuard<'_, AdminState> {
        self.state.lock().expect("admin lock poisoned")
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserRole;
    use crate::infrastructure::memory::{InMemoryAdminGateway, StaticConfirmation};

    fn sample_user(id: i64, username: &str) -> User {
        User {
            id,
            username: username.to_string(),
            fullname: None,
            role: UserRole::Reader,
        }
    }

    fn admin(
        gateway: Arc<InMemoryAdminGateway>,
        confirm: bool,
    ) -> (UserAdmin, Arc<StaticConfirmation>) {
        let confirmation = Arc::new(StaticConfirmation::new(confirm));
        (UserAdmin::new(gateway, confirmation.clone()), confirmation)
    }

    #[tokio::test]
    async fn test_load_lists_users() {
        let gateway = Arc::new(InMemoryAdminGateway::new());
        gateway.put_user(sample_user(1, "fedorov"));
        gateway.put_user(sample_user(2, "smirnova"));
        let (admin, _) = admin(gateway, true);

        admin.load().await.unwrap();

        assert_eq!(admin.users().len(), 2);
        assert!(admin.error().is_none());
    }

    #[tokio::test]
    async fn test_invalid_fullname_blocks_request() {
        let gateway = Arc::new(InMemoryAdminGateway::new());
        gateway.put_user(sample_user(1, "fedorov"));
        let (admin, _) = admin(gateway.clone(), true);
        admin.load().await.unwrap();
        let calls_before = gateway.call_count();

        let result = admin.update_user(1, &UserPatch::fullname("федоров н.с.")).await;

        assert!(result.is_err());
        assert_eq!(gateway.call_count(), calls_before);
        assert_eq!(
            admin.field_error(1).as_deref(),
            Some("ФИО должно быть в формате Фамилия И.О. (например, Федоров Н.С.)")
        );
    }

    #[tokio::test]
    async fn test_blank_fullname_is_accepted() {
        let gateway = Arc::new(InMemoryAdminGateway::new());
        gateway.put_user(sample_user(1, "fedorov"));
        let (admin, _) = admin(gateway, true);
        admin.load().await.unwrap();

        admin.update_user(1, &UserPatch::fullname("")).await.unwrap();

        assert!(admin.field_error(1).is_none());
    }

    #[tokio::test]
    async fn test_valid_fullname_updates_row_and_clears_error() {
        let gateway = Arc::new(InMemoryAdminGateway::new());
        gateway.put_user(sample_user(1, "fedorov"));
        let (admin, _) = admin(gateway, true);
        admin.load().await.unwrap();

        admin
            .update_user(1, &UserPatch::fullname("плохое фио"))
            .await
            .unwrap_err();
        assert!(admin.field_error(1).is_some());

        admin
            .update_user(1, &UserPatch::fullname("Федоров Н.С."))
            .await
            .unwrap();

        assert!(admin.field_error(1).is_none());
        assert_eq!(
            admin.users()[0].fullname.as_deref(),
            Some("Федоров Н.С.")
        );
    }

    #[tokio::test]
    async fn test_role_change_needs_no_fullname() {
        let gateway = Arc::new(InMemoryAdminGateway::new());
        gateway.put_user(sample_user(1, "fedorov"));
        let (admin, _) = admin(gateway, true);
        admin.load().await.unwrap();

        admin
            .update_user(1, &UserPatch::role(UserRole::Librarian))
            .await
            .unwrap();

        assert_eq!(admin.users()[0].role, UserRole::Librarian);
    }

    #[tokio::test]
    async fn test_delete_declined_keeps_user() {
        let gateway = Arc::new(InMemoryAdminGateway::new());
        gateway.put_user(sample_user(1, "fedorov"));
        let (admin, confirmation) = admin(gateway.clone(), false);
        admin.load().await.unwrap();
        let calls_before = gateway.call_count();

        let deleted = admin.delete_user(1).await.unwrap();

        assert!(!deleted);
        assert_eq!(admin.users().len(), 1);
        assert_eq!(gateway.call_count(), calls_before);
        assert_eq!(
            confirmation.prompts(),
            vec!["Удалить пользователя?".to_string()]
        );
    }

    #[tokio::test]
    async fn test_delete_confirmed_removes_user() {
        let gateway = Arc::new(InMemoryAdminGateway::new());
        gateway.put_user(sample_user(1, "fedorov"));
        gateway.put_user(sample_user(2, "smirnova"));
        let (admin, _) = admin(gateway, true);
        admin.load().await.unwrap();

        let deleted = admin.delete_user(1).await.unwrap();

        assert!(deleted);
        let users = admin.users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, 2);
    }
}
