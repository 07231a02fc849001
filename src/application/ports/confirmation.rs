//! Confirmation Port - 删除确认抽象
//!
//! 所有删除操作先询问用户；拒绝时不发出任何请求。
//! 具体实现：终端交互（infrastructure/console）或测试用脚本应答
//! （infrastructure/memory）。

use async_trait::async_trait;

/// Confirmation Port
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    /// 向用户展示提示文本，返回是否确认
    async fn confirm(&self, prompt: &str) -> bool;
}
