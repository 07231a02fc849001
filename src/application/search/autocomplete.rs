//! Autocomplete - 自动补全模型
//!
//! 职责：
//! - 随输入防抖地向后端请求作者/流派建议
//! - 空白输入直接清空建议列表，不发请求
//! - 过期响应（代际不匹配）直接丢弃，不得覆盖更新的状态
//! - 支持单选与多选两种模式，多选按 id 去重

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::application::ports::LibraryGatewayPort;
use crate::application::search::debounce::DebounceGate;
use crate::domain::library::NamedRef;

// ============================================================================
// 类型定义
// ============================================================================

/// 建议来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    Authors,
    Genres,
}

impl SearchScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchScope::Authors => "authors",
            SearchScope::Genres => "genres",
        }
    }
}

/// 选择模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// 选中即填入输入框，关闭建议列表
    Single,
    /// 选中追加到已选集合，清空输入框
    Multi,
}

#[derive(Debug, Default)]
struct AutocompleteState {
    query: String,
    suggestions: Vec<NamedRef>,
    open: bool,
    selected: Vec<NamedRef>,
    chosen: Option<NamedRef>,
}

struct Inner {
    gateway: Arc<dyn LibraryGatewayPort>,
    scope: SearchScope,
    mode: SelectionMode,
    gate: DebounceGate,
    state: Mutex<AutocompleteState>,
}

/// 自动补全控件模型
///
/// 句柄可廉价克隆，克隆体共享同一份状态。
#[derive(Clone)]
pub struct Autocomplete {
    inner: Arc<Inner>,
}

impl Autocomplete {
    pub fn new(
        gateway: Arc<dyn LibraryGatewayPort>,
        scope: SearchScope,
        mode: SelectionMode,
        debounce: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway,
                scope,
                mode,
                gate: DebounceGate::new(debounce),
                state: Mutex::new(AutocompleteState::default()),
            }),
        }
    }

    // ========================================================================
    // 输入与建议
    // ========================================================================

    /// 处理一次输入变更
    ///
    /// 空白输入立即清空建议且不发请求；否则启动防抖定时器，
    /// 到期后若代际仍最新才发起搜索请求。
    pub fn input(&self, text: &str) {
        let generation = self.inner.gate.bump();

        {
            let mut state = self.lock_state();
            state.query = text.to_string();
            if text.trim().is_empty() {
                state.suggestions.clear();
                state.open = false;
                return;
            }
        }

        let inner = self.inner.clone();
        let query = text.to_string();
        self.inner.gate.schedule(async move {
            if !inner.gate.is_current(generation) {
                return;
            }

            let result = match inner.scope {
                SearchScope::Authors => inner.gateway.search_authors(&query).await,
                SearchScope::Genres => inner.gateway.search_genres(&query).await,
            };

            let mut state = inner.state.lock().expect("autocomplete lock poisoned");
            if !inner.gate.is_current(generation) {
                return;
            }
            match result {
                Ok(items) => {
                    state.suggestions = items;
                    state.open = true;
                }
                Err(err) => {
                    tracing::warn!(
                        scope = inner.scope.as_str(),
                        query = %query,
                        error = %err,
                        "suggestion search failed"
                    );
                    state.suggestions.clear();
                    state.open = false;
                }
            }
        });
    }

    /// 选中一条建议
    ///
    /// 单选模式：建议名填入输入框，记录选中项，关闭列表。
    /// 多选模式：按 id 去重后追加到已选集合，清空输入框。
    /// 两种模式都会使挂起的搜索过期。
    pub fn select(&self, item: NamedRef) {
        self.inner.gate.bump();
        let mut state = self.lock_state();
        match self.inner.mode {
            SelectionMode::Single => {
                state.query = item.name.clone();
                state.chosen = Some(item);
            }
            SelectionMode::Multi => {
                if !state.selected.iter().any(|s| s.id == item.id) {
                    state.selected.push(item);
                }
                state.query.clear();
            }
        }
        state.suggestions.clear();
        state.open = false;
    }

    /// 从已选集合移除一项（多选模式）
    pub fn deselect(&self, id: i64) {
        let mut state = self.lock_state();
        state.selected.retain(|s| s.id != id);
    }

    /// 关闭建议列表（界面层在外部点击时调用）
    pub fn dismiss(&self) {
        let mut state = self.lock_state();
        state.open = false;
    }

    // ========================================================================
    // 状态读取
    // ========================================================================

    pub fn query(&self) -> String {
        self.lock_state().query.clone()
    }

    pub fn suggestions(&self) -> Vec<NamedRef> {
        self.lock_state().suggestions.clone()
    }

    pub fn is_open(&self) -> bool {
        self.lock_state().open
    }

    /// 已选集合（多选模式）
    pub fn selected(&self) -> Vec<NamedRef> {
        self.lock_state().selected.clone()
    }

    /// 当前选中项（单选模式）
    pub fn chosen(&self) -> Option<NamedRef> {
        self.lock_state().chosen.clone()
    }

    /// 等待所有挂起的搜索结束（测试用）
    pub async fn settle(&self) {
        self.inner.gate.settle().await;
    }

    fn lock_state(&self) -> MutexGuard<'_, AutocompleteState> {
        self.inner.state.lock().expect("autocomplete lock poisoned")
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryLibraryGateway;

    fn gateway_with_authors() -> Arc<InMemoryLibraryGateway> {
        let gateway = Arc::new(InMemoryLibraryGateway::new());
        gateway.put_author(NamedRef::new(1, "Пушкин А.С."));
        gateway.put_author(NamedRef::new(2, "Пушков Б.В."));
        gateway
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_sends_single_request() {
        let gateway = gateway_with_authors();
        let ac = Autocomplete::new(
            gateway.clone(),
            SearchScope::Authors,
            SelectionMode::Multi,
            Duration::from_millis(300),
        );

        ac.input("п");
        ac.input("пу");
        ac.input("пуш");
        ac.settle().await;

        assert_eq!(gateway.search_call_count(), 1);
        assert_eq!(ac.suggestions().len(), 2);
        assert!(ac.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_clears_without_request() {
        let gateway = gateway_with_authors();
        let ac = Autocomplete::new(
            gateway.clone(),
            SearchScope::Authors,
            SelectionMode::Multi,
            Duration::from_millis(300),
        );

        ac.input("пуш");
        ac.settle().await;
        assert!(!ac.suggestions().is_empty());

        ac.input("   ");
        ac.settle().await;

        assert!(ac.suggestions().is_empty());
        assert!(!ac.is_open());
        assert_eq!(gateway.search_call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_input_discards_stale_response() {
        let gateway = gateway_with_authors();
        gateway.set_search_delay(Duration::from_millis(200));
        let ac = Autocomplete::new(
            gateway.clone(),
            SearchScope::Authors,
            SelectionMode::Multi,
            Duration::from_millis(300),
        );

        ac.input("пуш");
        // 让定时器到期、请求已在途
        tokio::time::sleep(Duration::from_millis(350)).await;
        // 在响应返回前清空输入
        ac.input("");
        ac.settle().await;

        // 在途响应因代际过期被丢弃
        assert!(ac.suggestions().is_empty());
        assert!(!ac.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_multi_select_deduplicates_by_id() {
        let gateway = gateway_with_authors();
        let ac = Autocomplete::new(
            gateway,
            SearchScope::Authors,
            SelectionMode::Multi,
            Duration::from_millis(300),
        );

        ac.select(NamedRef::new(1, "Пушкин А.С."));
        ac.select(NamedRef::new(1, "Пушкин А.С."));
        ac.select(NamedRef::new(2, "Пушков Б.В."));

        assert_eq!(ac.selected().len(), 2);
        assert_eq!(ac.query(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_select_fills_query() {
        let gateway = gateway_with_authors();
        let ac = Autocomplete::new(
            gateway,
            SearchScope::Authors,
            SelectionMode::Single,
            Duration::from_millis(300),
        );

        ac.input("пуш");
        ac.settle().await;
        ac.select(NamedRef::new(1, "Пушкин А.С."));

        assert_eq!(ac.query(), "Пушкин А.С.");
        assert_eq!(ac.chosen().map(|c| c.id), Some(1));
        assert!(!ac.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deselect_removes_item() {
        let gateway = gateway_with_authors();
        let ac = Autocomplete::new(
            gateway,
            SearchScope::Authors,
            SelectionMode::Multi,
            Duration::from_millis(300),
        );

        ac.select(NamedRef::new(1, "Пушкин А.С."));
        ac.select(NamedRef::new(2, "Пушков Б.В."));
        ac.deselect(1);

        let selected = ac.selected();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, 2);
    }
}
