//! Terminal Confirmation Implementation
//!
//! 在终端打印提示并读取一行应答。
//! 接受 y/yes 与俄文 д/да（不区分大小写），其余一律视为拒绝。

use async_trait::async_trait;
use tracing::warn;

use crate::application::ports::ConfirmationPort;

/// 终端确认端口
pub struct TerminalConfirmation;

impl TerminalConfirmation {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalConfirmation {
    fn default() -> Self {
        Self::new()
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "д" | "да"
    )
}

#[async_trait]
impl ConfirmationPort for TerminalConfirmation {
    async fn confirm(&self, prompt: &str) -> bool {
        let prompt = prompt.to_string();
        // 标准输入是阻塞的，挪到阻塞线程池读取
        let answer = tokio::task::spawn_blocking(move || {
            println!("{prompt} [y/N]");
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|_| line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => is_affirmative(&line),
            Ok(Err(err)) => {
                warn!(error = %err, "Failed to read confirmation answer");
                false
            }
            Err(err) => {
                warn!(error = %err, "Confirmation task failed");
                false
            }
        }
    }
}
