//! Scripted Confirmation Implementation
//!
//! 固定应答的确认替身：构造时给定答案，记录收到的每条提示文本。

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::ports::ConfirmationPort;

/// 固定应答的确认端口
pub struct StaticConfirmation {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl StaticConfirmation {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 已展示过的提示文本，按先后顺序
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock poisoned").clone()
    }
}

#[async_trait]
impl ConfirmationPort for StaticConfirmation {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts
            .lock()
            .expect("prompts lock poisoned")
            .push(prompt.to_string());
        self.answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_prompts_in_order() {
        let confirmation = StaticConfirmation::new(false);

        assert!(!confirmation.confirm("Удалить раздел?").await);
        assert!(!confirmation.confirm("Удалить блок?").await);

        assert_eq!(
            confirmation.prompts(),
            vec!["Удалить раздел?".to_string(), "Удалить блок?".to_string()]
        );
    }
}
