//! Book Picker - 选书弹窗模型
//!
//! 职责：
//! - 打开时一次性加载作者/流派筛选项
//! - 搜索词、排序、作者、流派四个筛选条件任一变更即防抖重查书目
//! - 选中一本书后关闭弹窗并保留选中结果

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::application::error::ApplicationError;
use crate::application::ports::{BookFilter, LibraryGatewayPort, SortOrder};
use crate::application::search::debounce::DebounceGate;
use crate::domain::library::{Book, NamedRef};

#[derive(Debug, Default)]
struct PickerState {
    open: bool,
    loading: bool,
    filter: BookFilter,
    books: Vec<Book>,
    author_options: Vec<NamedRef>,
    genre_options: Vec<NamedRef>,
    selection: Option<Book>,
    error: Option<String>,
}

struct Inner {
    gateway: Arc<dyn LibraryGatewayPort>,
    gate: DebounceGate,
    state: Mutex<PickerState>,
}

/// 选书弹窗模型
#[derive(Clone)]
pub struct BookPicker {
    inner: Arc<Inner>,
}

impl BookPicker {
    pub fn new(gateway: Arc<dyn LibraryGatewayPort>, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway,
                gate: DebounceGate::new(debounce),
                state: Mutex::new(PickerState::default()),
            }),
        }
    }

    // ========================================================================
    // 打开与关闭
    // ========================================================================

    /// 打开弹窗：并行加载筛选项，随后按防抖节奏加载书目
    pub async fn open(&self) {
        {
            let mut state = self.lock_state();
            state.open = true;
            state.selection = None;
        }

        let (authors, genres) = tokio::join!(
            self.inner.gateway.list_authors(),
            self.inner.gateway.list_genres(),
        );

        {
            let mut state = self.lock_state();
            match authors {
                Ok(items) => state.author_options = items,
                Err(err) => tracing::warn!(error = %err, "failed to load author options"),
            }
            match genres {
                Ok(items) => state.genre_options = items,
                Err(err) => tracing::warn!(error = %err, "failed to load genre options"),
            }
        }

        self.schedule_reload();
    }

    pub fn close(&self) {
        self.inner.gate.bump();
        let mut state = self.lock_state();
        state.open = false;
    }

    // ========================================================================
    // 筛选条件
    // ========================================================================

    pub fn set_search(&self, text: &str) {
        {
            let mut state = self.lock_state();
            state.filter.search = if text.trim().is_empty() {
                None
            } else {
                Some(text.to_string())
            };
        }
        self.schedule_reload();
    }

    pub fn set_sort_order(&self, order: SortOrder) {
        {
            let mut state = self.lock_state();
            state.filter.sort_order = order;
        }
        self.schedule_reload();
    }

    pub fn set_author_filter(&self, author_id: Option<i64>) {
        {
            let mut state = self.lock_state();
            state.filter.author_id = author_id;
        }
        self.schedule_reload();
    }

    pub fn set_genre_filter(&self, genre_id: Option<i64>) {
        {
            let mut state = self.lock_state();
            state.filter.genre_id = genre_id;
        }
        self.schedule_reload();
    }

    /// 防抖调度一次书目重查
    fn schedule_reload(&self) {
        let generation = self.inner.gate.bump();
        let inner = self.inner.clone();
        self.inner.gate.schedule(async move {
            if !inner.gate.is_current(generation) {
                return;
            }

            let filter = {
                let mut state = inner.state.lock().expect("picker lock poisoned");
                state.loading = true;
                state.filter.clone()
            };

            let result = inner.gateway.list_books(&filter).await;

            let mut state = inner.state.lock().expect("picker lock poisoned");
            if !inner.gate.is_current(generation) {
                return;
            }
            state.loading = false;
            match result {
                Ok(books) => {
                    state.books = books;
                    state.error = None;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "book search failed");
                    state.error = Some(ApplicationError::Gateway(err).user_message());
                }
            }
        });
    }

    // ========================================================================
    // 选择
    // ========================================================================

    /// 选中列表中的一本书，关闭弹窗并返回该书
    pub fn choose(&self, book_id: i64) -> Option<Book> {
        self.inner.gate.bump();
        let mut state = self.lock_state();
        let picked = state.books.iter().find(|b| b.id == book_id).cloned();
        if let Some(book) = picked.clone() {
            state.selection = Some(book);
            state.open = false;
        }
        picked
    }

    // ========================================================================
    // 状态读取
    // ========================================================================

    pub fn is_open(&self) -> bool {
        self.lock_state().open
    }

    pub fn is_loading(&self) -> bool {
        self.lock_state().loading
    }

    pub fn books(&self) -> Vec<Book> {
        self.lock_state().books.clone()
    }

    pub fn author_options(&self) -> Vec<NamedRef> {
        self.lock_state().author_options.clone()
    }

    pub fn genre_options(&self) -> Vec<NamedRef> {
        self.lock_state().genre_options.clone()
    }

    pub fn filter(&self) -> BookFilter {
        self.lock_state().filter.clone()
    }

    pub fn selection(&self) -> Option<Book> {
        self.lock_state().selection.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock_state().error.clone()
    }

    /// 等待挂起的重查结束（测试用）
    pub async fn settle(&self) {
        self.inner.gate.settle().await;
    }

    fn lock_state(&self) -> MutexGuard<'_, PickerState> {
        self.inner.state.lock().expect("picker lock poisoned")
    }
}

// ============================================================================
// 测试
// ============================================================================
