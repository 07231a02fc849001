//! In-Memory Library Gateway Implementation
//!
//! 图书馆 API 的内存替身：图书、作者、体裁分别存放，
//! 过滤/搜索语义与真实后端一致（大小写不敏感的子串匹配）。
//! 附带按 id 的取书计数、全局与分类调用计数、可注入的搜索延迟。

use std::sync::atomic::{AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use http::StatusCode;

use crate::application::ports::{BookDraft, BookFilter, GatewayError, LibraryGatewayPort, SortOrder};
use crate::domain::library::{Book, BookInfo, NamedRef};

/// 内存图书馆网关
pub struct InMemoryLibraryGateway {
    books: DashMap<i64, Book>,
    authors: DashMap<i64, NamedRef>,
    genres: DashMap<i64, NamedRef>,
    next_id: AtomicI64,
    calls: AtomicUsize,
    list_calls: AtomicUsize,
    search_calls: AtomicUsize,
    fetches_per_book: DashMap<i64, usize>,
    search_delay_ms: AtomicU64,
}

impl InMemoryLibraryGateway {
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
            authors: DashMap::new(),
            genres: DashMap::new(),
            // 与测试夹具中手工分配的小 id 错开
            next_id: AtomicI64::new(1000),
            calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
            fetches_per_book: DashMap::new(),
            search_delay_ms: AtomicU64::new(0),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn put_book(&self, book: Book) {
        self.books.insert(book.id, book);
    }

    pub fn put_author(&self, author: NamedRef) {
        self.authors.insert(author.id, author);
    }

    pub fn put_genre(&self, genre: NamedRef) {
        self.genres.insert(genre.id, genre);
    }

    /// 指定图书被 fetch_book 请求的累计次数（含失败的请求）
    pub fn fetch_count(&self, book_id: i64) -> usize {
        self.fetches_per_book
            .get(&book_id)
            .map(|count| *count)
            .unwrap_or(0)
    }

    /// 所有网关方法的累计调用次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// list_books 的累计调用次数
    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// search_authors/search_genres 的累计调用次数
    pub fn search_call_count(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// 让后续搜索在返回前挂起给定时长（模拟慢响应）
    pub fn set_search_delay(&self, delay: Duration) {
        self.search_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn alloc_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn not_found(what: &str) -> GatewayError {
        GatewayError::server(StatusCode::NOT_FOUND, format!("{what} not found"))
    }

    async fn search_pause(&self) {
        let millis = self.search_delay_ms.load(Ordering::SeqCst);
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }

    fn search_in(map: &DashMap<i64, NamedRef>, query: &str) -> Vec<NamedRef> {
        let needle = query.to_lowercase();
        let mut found: Vec<NamedRef> = map
            .iter()
            .filter(|entry| entry.value().name.to_lowercase().contains(&needle))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by_key(|r| r.id);
        found
    }

    fn sorted_refs(map: &DashMap<i64, NamedRef>) -> Vec<NamedRef> {
        let mut refs: Vec<NamedRef> = map.iter().map(|entry| entry.value().clone()).collect();
        refs.sort_by_key(|r| r.id);
        refs
    }

    /// 根据草稿里的 id 列表还原引用实体，未注册的 id 给占位名
    fn refs_for_ids(map: &DashMap<i64, NamedRef>, ids: &[i64], placeholder: &str) -> Vec<NamedRef> {
        ids.iter()
            .map(|&id| {
                map.get(&id)
                    .map(|entry| entry.value().clone())
                    .unwrap_or_else(|| NamedRef::new(id, format!("{placeholder} {id}")))
            })
            .collect()
    }

    fn book_from_draft(&self, id: i64, draft: &BookDraft) -> Book {
        Book {
            id,
            title: draft.title.clone(),
            annotations: Some(draft.annotations.clone()),
            library_description: Some(draft.library_description.clone()),
            image_url: draft.image.as_ref().map(|i| i.file_name.clone()),
            year_of_publication: draft.year_of_publication.clone(),
            authors: Self::refs_for_ids(&self.authors, &draft.author_ids, "Автор"),
            genres: Self::refs_for_ids(&self.genres, &draft.genre_ids, "Жанр"),
        }
    }
}

impl Default for InMemoryLibraryGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LibraryGatewayPort for InMemoryLibraryGateway {
    async fn fetch_book(&self, id: i64) -> Result<BookInfo, GatewayError> {
        self.tick();
        *self.fetches_per_book.entry(id).or_insert(0) += 1;
        self.books
            .get(&id)
            .map(|entry| BookInfo::from(entry.value().clone()))
            .ok_or_else(|| Self::not_found("Book"))
    }

    async fn list_books(&self, filter: &BookFilter) -> Result<Vec<Book>, GatewayError> {
        self.tick();
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let needle = filter.search.as_ref().map(|s| s.to_lowercase());
        let mut books: Vec<Book> = self
            .books
            .iter()
            .filter(|entry| {
                let book = entry.value();
                if let Some(needle) = &needle {
                    if !book.title.to_lowercase().contains(needle) {
                        return false;
                    }
                }
                if let Some(author_id) = filter.author_id {
                    if !book.authors.iter().any(|a| a.id == author_id) {
                        return false;
                    }
                }
                if let Some(genre_id) = filter.genre_id {
                    if !book.genres.iter().any(|g| g.id == genre_id) {
                        return false;
                    }
                }
                true
            })
            .map(|entry| entry.value().clone())
            .collect();

        books.sort_by(|a, b| a.title.cmp(&b.title));
        if filter.sort_order == SortOrder::Desc {
            books.reverse();
        }
        Ok(books)
    }

    async fn create_book(&self, draft: &BookDraft) -> Result<Book, GatewayError> {
        self.tick();
        let book = self.book_from_draft(self.alloc_id(), draft);
        self.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update_book(&self, id: i64, draft: &BookDraft) -> Result<Book, GatewayError> {
        self.tick();
        if !self.books.contains_key(&id) {
            return Err(Self::not_found("Book"));
        }
        let book = self.book_from_draft(id, draft);
        self.books.insert(id, book.clone());
        Ok(book)
    }

    async fn delete_book(&self, id: i64) -> Result<(), GatewayError> {
        self.tick();
        self.books
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found("Book"))
    }

    async fn list_authors(&self) -> Result<Vec<NamedRef>, GatewayError> {
        self.tick();
        Ok(Self::sorted_refs(&self.authors))
    }

    async fn list_genres(&self) -> Result<Vec<NamedRef>, GatewayError> {
        self.tick();
        Ok(Self::sorted_refs(&self.genres))
    }

    async fn search_authors(&self, query: &str) -> Result<Vec<NamedRef>, GatewayError> {
        self.tick();
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.search_pause().await;
        Ok(Self::search_in(&self.authors, query))
    }

    async fn search_genres(&self, query: &str) -> Result<Vec<NamedRef>, GatewayError> {
        self.tick();
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.search_pause().await;
        Ok(Self::search_in(&self.genres, query))
    }

    async fn create_author(&self, name: &str) -> Result<NamedRef, GatewayError> {
        self.tick();
        let author = NamedRef::new(self.alloc_id(), name);
        self.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn rename_author(&self, id: i64, name: &str) -> Result<NamedRef, GatewayError> {
        self.tick();
        let mut entry = self
            .authors
            .get_mut(&id)
            .ok_or_else(|| Self::not_found("Author"))?;
        entry.value_mut().name = name.to_string();
        Ok(entry.value().clone())
    }

    async fn delete_author(&self, id: i64) -> Result<(), GatewayError> {
        self.tick();
        self.authors
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found("Author"))
    }

    async fn create_genre(&self, name: &str) -> Result<NamedRef, GatewayError> {
        self.tick();
        let genre = NamedRef::new(self.alloc_id(), name);
        self.genres.insert(genre.id, genre.clone());
        Ok(genre)
    }

    async fn rename_genre(&self, id: i64, name: &str) -> Result<NamedRef, GatewayError> {
        self.tick();
        let mut entry = self
            .genres
            .get_mut(&id)
            .ok_or_else(|| Self::not_found("Genre"))?;
        entry.value_mut().name = name.to_string();
        Ok(entry.value().clone())
    }

    async fn delete_genre(&self, id: i64) -> Result<(), GatewayError> {
        self.tick();
        self.genres
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found("Genre"))
    }
}
