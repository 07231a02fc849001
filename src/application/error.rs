//! 应用层错误定义
//!
//! 统一的视图模型操作错误类型

use thiserror::Error;

use crate::application::ports::GatewayError;

/// 应用层错误
#[derive(Debug, Clone, Error)]
pub enum ApplicationError {
    /// 本地校验错误（阻止请求发出，显示在表单旁）
    #[error("Validation error: {0}")]
    Validation(String),

    /// 网关错误（传输/服务端）
    #[error("{0}")]
    Gateway(#[from] GatewayError),
}

impl ApplicationError {
    /// 创建校验错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// 面向用户的错误文本
    ///
    /// 服务端带 detail 的错误优先取 detail，其余取 Display 文本
    pub fn user_message(&self) -> String {
        match self {
            ApplicationError::Validation(message) => message.clone(),
            ApplicationError::Gateway(GatewayError::Server { detail, .. }) => detail.clone(),
            ApplicationError::Gateway(err) => err.to_string(),
        }
    }
}
