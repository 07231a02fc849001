//! In-Memory Admin Gateway Implementation
//!
//! 用户管理 API 的内存替身，带全局调用计数。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use http::StatusCode;

use crate::application::ports::{AdminGatewayPort, GatewayError, UserPatch};
use crate::domain::user::User;

/// 内存用户管理网关
pub struct InMemoryAdminGateway {
    users: DashMap<i64, User>,
    calls: AtomicUsize,
}

impl InMemoryAdminGateway {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn put_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    /// 所有网关方法的累计调用次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn not_found() -> GatewayError {
        GatewayError::server(StatusCode::NOT_FOUND, "User not found")
    }
}

impl Default for InMemoryAdminGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdminGatewayPort for InMemoryAdminGateway {
    async fn list_users(&self) -> Result<Vec<User>, GatewayError> {
        self.tick();
        let mut users: Vec<User> = self.users.iter().map(|entry| entry.value().clone()).collect();
        users.sort_by_key(|user| user.id);
        Ok(users)
    }

    async fn update_user(&self, id: i64, patch: &UserPatch) -> Result<User, GatewayError> {
        self.tick();
        let mut entry = self.users.get_mut(&id).ok_or_else(Self::not_found)?;
        let user = entry.value_mut();
        if let Some(username) = &patch.username {
            user.username = username.clone();
        }
        if let Some(fullname) = &patch.fullname {
            user.fullname = Some(fullname.clone());
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, id: i64) -> Result<(), GatewayError> {
        self.tick();
        self.users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(Self::not_found)
    }
}
