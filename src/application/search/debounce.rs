//! Debounce Gate - 防抖与代际守卫
//!
//! 搜索控件共用的防抖机制：
//! - 每次输入使代际 +1，旧定时器醒来后发现代际不匹配即放弃
//! - 响应落地前再查一次代际，丢弃迟到的过期响应
//! - settle() 等待所有挂起任务结束（测试用）

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

/// 防抖门
pub(crate) struct DebounceGate {
    delay: Duration,
    generation: AtomicU64,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl DebounceGate {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// 使所有已调度的工作过期，返回新的代际号
    pub(crate) fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// 检查代际号是否仍是最新
    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// 延迟 delay 后执行任务；任务内部自行复查代际
    pub(crate) fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        let mut pending = self.pending.lock().expect("debounce lock poisoned");
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// 等待所有挂起任务结束
    pub(crate) async fn settle(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut pending = self.pending.lock().expect("debounce lock poisoned");
            pending.drain(..).collect()
        };
        for handle in handles {
            let _ = handle.await;
        }
    }
}
