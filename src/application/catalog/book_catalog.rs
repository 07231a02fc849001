//! Book Catalog - 图书目录管理模型
//!
//! 职责：
//! - 并行加载图书、作者、体裁三份列表
//! - 按作者/体裁/排序条件重查图书
//! - 维护作者与体裁引用实体（创建、重命名、删除）
//! - 删除图书不询问确认，删除作者/体裁先询问确认

use std::sync::{Arc, Mutex, MutexGuard};

use crate::application::error::ApplicationError;
use crate::application::ports::{BookFilter, ConfirmationPort, LibraryGatewayPort};
use crate::domain::library::{Book, NamedRef};

#[derive(Debug, Default)]
struct CatalogState {
    books: Vec<Book>,
    authors: Vec<NamedRef>,
    genres: Vec<NamedRef>,
    filter: BookFilter,
    loading: bool,
    error: Option<String>,
}

/// 图书目录管理模型
pub struct BookCatalog {
    gateway: Arc<dyn LibraryGatewayPort>,
    confirmation: Arc<dyn ConfirmationPort>,
    state: Mutex<CatalogState>,
}

impl BookCatalog {
    pub fn new(
        gateway: Arc<dyn LibraryGatewayPort>,
        confirmation: Arc<dyn ConfirmationPort>,
    ) -> Self {
        Self {
            gateway,
            confirmation,
            state: Mutex::new(CatalogState::default()),
        }
    }

    // ========================================================================
    // 加载与筛选
    // ========================================================================

    /// 并行加载图书、作者、体裁
    ///
    /// 任一请求失败即记录错误，已持有的列表保持不变。
    pub async fn load(&self) -> Result<(), ApplicationError> {
        let filter = {
            let mut state = self.lock_state();
            state.loading = true;
            state.error = None;
            state.filter.clone()
        };

        let (books, authors, genres) = tokio::join!(
            self.gateway.list_books(&filter),
            self.gateway.list_authors(),
            self.gateway.list_genres(),
        );

        let mut state = self.lock_state();
        state.loading = false;
        match (books, authors, genres) {
            (Ok(books), Ok(authors), Ok(genres)) => {
                tracing::info!(
                    books = books.len(),
                    authors = authors.len(),
                    genres = genres.len(),
                    "book catalog loaded"
                );
                state.books = books;
                state.authors = authors;
                state.genres = genres;
                Ok(())
            }
            (books, authors, genres) => {
                let err = [
                    books.err().map(ApplicationError::Gateway),
                    authors.err().map(ApplicationError::Gateway),
                    genres.err().map(ApplicationError::Gateway),
                ]
                .into_iter()
                .flatten()
                .next()
                .unwrap_or_else(|| ApplicationError::validation("Ошибка загрузки данных"));
                tracing::warn!(error = %err, "book catalog load failed");
                state.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// 更换过滤条件并重查图书列表，作者/体裁列表不动
    pub async fn apply_filters(&self, filter: BookFilter) -> Result<(), ApplicationError> {
        {
            let mut state = self.lock_state();
            state.filter = filter.clone();
        }
        self.reload_books(&filter).await
    }

    /// 按当前过滤条件重查图书列表
    pub async fn refresh_books(&self) -> Result<(), ApplicationError> {
        let filter = self.lock_state().filter.clone();
        self.reload_books(&filter).await
    }

    async fn reload_books(&self, filter: &BookFilter) -> Result<(), ApplicationError> {
        match self.gateway.list_books(filter).await {
            Ok(books) => {
                let mut state = self.lock_state();
                state.books = books;
                state.error = None;
                Ok(())
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    // ========================================================================
    // 图书删除
    // ========================================================================

    /// 删除图书：立即发送请求，成功后从持有列表中移除
    pub async fn delete_book(&self, book_id: i64) -> Result<(), ApplicationError> {
        match self.gateway.delete_book(book_id).await {
            Ok(()) => {
                tracing::info!(book_id, "book deleted");
                let mut state = self.lock_state();
                state.books.retain(|b| b.id != book_id);
                Ok(())
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    // ========================================================================
    // 作者维护
    // ========================================================================

    /// 创建作者；空名称不发请求
    pub async fn create_author(
        &self,
        name: &str,
    ) -> Result<Option<NamedRef>, ApplicationError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        match self.gateway.create_author(name).await {
            Ok(author) => {
                tracing::info!(author_id = author.id, name = %author.name, "author created");
                let mut state = self.lock_state();
                state.authors.push(author.clone());
                Ok(Some(author))
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    /// 重命名作者；空名称不发请求，返回 false
    pub async fn rename_author(
        &self,
        author_id: i64,
        name: &str,
    ) -> Result<bool, ApplicationError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        match self.gateway.rename_author(author_id, name).await {
            Ok(renamed) => {
                let mut state = self.lock_state();
                if let Some(entry) = state.authors.iter_mut().find(|a| a.id == author_id) {
                    *entry = renamed;
                }
                Ok(true)
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    /// 删除作者：先询问确认；拒绝时返回 Ok(false)
    pub async fn delete_author(&self, author_id: i64) -> Result<bool, ApplicationError> {
        if !self
            .confirmation
            .confirm("Are you sure you want to delete this author?")
            .await
        {
            return Ok(false);
        }
        match self.gateway.delete_author(author_id).await {
            Ok(()) => {
                tracing::info!(author_id, "author deleted");
                let mut state = self.lock_state();
                state.authors.retain(|a| a.id != author_id);
                Ok(true)
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    // ========================================================================
    // 体裁维护
    // ========================================================================

    /// 创建体裁；空名称不发请求
    pub async fn create_genre(&self, name: &str) -> Result<Option<NamedRef>, ApplicationError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        match self.gateway.create_genre(name).await {
            Ok(genre) => {
                tracing::info!(genre_id = genre.id, name = %genre.name, "genre created");
                let mut state = self.lock_state();
                state.genres.push(genre.clone());
                Ok(Some(genre))
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    /// 重命名体裁；空名称不发请求，返回 false
    pub async fn rename_genre(&self, genre_id: i64, name: &str) -> Result<bool, ApplicationError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        match self.gateway.rename_genre(genre_id, name).await {
            Ok(renamed) => {
                let mut state = self.lock_state();
                if let Some(entry) = state.genres.iter_mut().find(|g| g.id == genre_id) {
                    *entry = renamed;
                }
                Ok(true)
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    /// 删除体裁：先询问确认；拒绝时返回 Ok(false)
    pub async fn delete_genre(&self, genre_id: i64) -> Result<bool, ApplicationError> {
        if !self
            .confirmation
            .confirm("Are you sure you want to delete this genre?")
            .await
        {
            return Ok(false);
        }
        match self.gateway.delete_genre(genre_id).await {
            Ok(()) => {
                tracing::info!(genre_id, "genre deleted");
                let mut state = self.lock_state();
                state.genres.retain(|g| g.id != genre_id);
                Ok(true)
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    // ========================================================================
    // 状态读取
    // ========================================================================

    pub fn books(&self) -> Vec<Book> {
        self.lock_state().books.clone()
    }

    pub fn authors(&self) -> Vec<NamedRef> {
        self.lock_state().authors.clone()
    }

    pub fn genres(&self) -> Vec<NamedRef> {
        self.lock_state().genres.clone()
    }

    pub fn filter(&self) -> BookFilter {
        self.lock_state().filter.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock_state().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock_state().error.clone()
    }

    fn gateway_failure(&self, err: crate::application::ports::GatewayError) -> ApplicationError {
        let err = ApplicationError::Gateway(err);
        tracing::warn!(error = %err, "book catalog request failed");
        let mut state = self.lock_state();
        state.error = Some(err.user_message());
        err
    }

    fn lock_state(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().expect("catalog lock poisoned")
    }
}

// ============================================================================
// 测试
// ============================================================================
