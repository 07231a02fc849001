//! HTTP Admin Gateway - 用户管理网关适配器
//!
//! 通过 REST 后端实现 AdminGatewayPort。
//! 注意 /admin 路由挂在后端根路径下，不带 /v2 前缀。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{AdminGatewayPort, GatewayError, UserPatch};
use crate::domain::user::User;

use super::client::RestClient;
use super::dto::{UserDto, UserPatchBody};

/// 用户管理的 HTTP 适配器
pub struct HttpAdminGateway {
    client: Arc<RestClient>,
}

impl HttpAdminGateway {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AdminGatewayPort for HttpAdminGateway {
    async fn list_users(&self) -> Result<Vec<User>, GatewayError> {
        debug!("Listing users");
        let dtos: Vec<UserDto> = self
            .client
            .get_json(self.client.root_url("/admin/users"), &[])
            .await?;
        dtos.into_iter().map(UserDto::into_domain).collect()
    }

    async fn update_user(&self, id: i64, patch: &UserPatch) -> Result<User, GatewayError> {
        let body = UserPatchBody {
            username: patch.username.as_deref(),
            fullname: patch.fullname.as_deref(),
            role: patch.role.as_ref().map(|role| role.as_str()),
        };
        let dto: UserDto = self
            .client
            .put_json(self.client.root_url(&format!("/admin/users/{id}")), &body)
            .await?;
        dto.into_domain()
    }

    async fn delete_user(&self, id: i64) -> Result<(), GatewayError> {
        self.client
            .delete(self.client.root_url(&format!("/admin/users/{id}")))
            .await
    }
}
