//! HTTP Library Gateway - 图书馆网关适配器
//!
//! 通过 REST 后端实现 LibraryGatewayPort：
//! - 图书的过滤列表、单本获取、multipart 创建/更新、删除
//! - 作者/体裁的列表、前缀搜索与增删改（引用实体路径带尾斜杠）

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::application::ports::{BookDraft, BookFilter, GatewayError, LibraryGatewayPort};
use crate::domain::library::{Book, BookInfo, NamedRef};

use super::client::RestClient;
use super::dto::{BookDto, NameBody, NamedRefDto};

/// 图书馆资源的 HTTP 适配器
pub struct HttpLibraryGateway {
    client: Arc<RestClient>,
}

impl HttpLibraryGateway {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }

    /// 组装图书 multipart 表单
    ///
    /// 作者/体裁以逗号拼接的 id 列表提交，
    /// 出版年份与封面文件仅在提供时附带。
    fn book_form(draft: &BookDraft) -> Result<Form, GatewayError> {
        let mut form = Form::new()
            .text("title", draft.title.clone())
            .text("annotations", draft.annotations.clone())
            .text("library_description", draft.library_description.clone())
            .text("author_ids", join_ids(&draft.author_ids))
            .text("genre_ids", join_ids(&draft.genre_ids));
        if let Some(year) = &draft.year_of_publication {
            form = form.text("year_of_publication", year.clone());
        }
        if let Some(image) = &draft.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime_type)
                .map_err(|e| GatewayError::Network(format!("Invalid image upload: {e}")))?;
            form = form.part("image_url", part);
        }
        Ok(form)
    }

    async fn list_refs(&self, path: &str) -> Result<Vec<NamedRef>, GatewayError> {
        let dtos: Vec<NamedRefDto> = self.client.get_json(self.client.url(path), &[]).await?;
        Ok(dtos.into_iter().map(NamedRef::from).collect())
    }

    async fn search_refs(&self, path: &str, query: &str) -> Result<Vec<NamedRef>, GatewayError> {
        let dtos: Vec<NamedRefDto> = self
            .client
            .get_json(self.client.url(path), &[("q", query.to_string())])
            .await?;
        Ok(dtos.into_iter().map(NamedRef::from).collect())
    }

    async fn create_ref(&self, path: &str, name: &str) -> Result<NamedRef, GatewayError> {
        let dto: NamedRefDto = self
            .client
            .post_json(self.client.url(path), &NameBody { name })
            .await?;
        Ok(dto.into())
    }

    async fn rename_ref(&self, path: &str, name: &str) -> Result<NamedRef, GatewayError> {
        let dto: NamedRefDto = self
            .client
            .put_json(self.client.url(path), &NameBody { name })
            .await?;
        Ok(dto.into())
    }
}

/// 图书列表过滤参数编码，sort_order 恒有
fn book_params(filter: &BookFilter) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(search) = &filter.search {
        params.push(("search", search.clone()));
    }
    params.push(("sort_order", filter.sort_order.as_str().to_string()));
    if let Some(author_id) = filter.author_id {
        params.push(("author_id", author_id.to_string()));
    }
    if let Some(genre_id) = filter.genre_id {
        params.push(("genre_id", genre_id.to_string()));
    }
    params
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl LibraryGatewayPort for HttpLibraryGateway {
    async fn fetch_book(&self, id: i64) -> Result<BookInfo, GatewayError> {
        debug!(book_id = id, "Fetching book metadata");
        let dto: BookDto = self
            .client
            .get_json(self.client.url(&format!("/library/books/{id}")), &[])
            .await?;
        Ok(BookInfo::from(Book::from(dto)))
    }

    async fn list_books(&self, filter: &BookFilter) -> Result<Vec<Book>, GatewayError> {
        let dtos: Vec<BookDto> = self
            .client
            .get_json(self.client.url("/library/books/"), &book_params(filter))
            .await?;
        Ok(dtos.into_iter().map(Book::from).collect())
    }

    async fn create_book(&self, draft: &BookDraft) -> Result<Book, GatewayError> {
        let form = Self::book_form(draft)?;
        let dto: BookDto = self
            .client
            .post_multipart(self.client.url("/library/books/"), form)
            .await?;
        Ok(dto.into())
    }

    async fn update_book(&self, id: i64, draft: &BookDraft) -> Result<Book, GatewayError> {
        let form = Self::book_form(draft)?;
        let dto: BookDto = self
            .client
            .put_multipart(self.client.url(&format!("/library/books/{id}")), form)
            .await?;
        Ok(dto.into())
    }

    async fn delete_book(&self, id: i64) -> Result<(), GatewayError> {
        self.client
            .delete(self.client.url(&format!("/library/books/{id}")))
            .await
    }

    async fn list_authors(&self) -> Result<Vec<NamedRef>, GatewayError> {
        self.list_refs("/library/authors/").await
    }

    async fn list_genres(&self) -> Result<Vec<NamedRef>, GatewayError> {
        self.list_refs("/library/genres/").await
    }

    async fn search_authors(&self, query: &str) -> Result<Vec<NamedRef>, GatewayError> {
        self.search_refs("/library/authors/search/", query).await
    }

    async fn search_genres(&self, query: &str) -> Result<Vec<NamedRef>, GatewayError> {
        self.search_refs("/library/genres/search/", query).await
    }

    async fn create_author(&self, name: &str) -> Result<NamedRef, GatewayError> {
        self.create_ref("/library/authors/", name).await
    }

    async fn rename_author(&self, id: i64, name: &str) -> Result<NamedRef, GatewayError> {
        self.rename_ref(&format!("/library/authors/{id}/"), name)
            .await
    }

    async fn delete_author(&self, id: i64) -> Result<(), GatewayError> {
        self.client
            .delete(self.client.url(&format!("/library/authors/{id}/")))
            .await
    }

    async fn create_genre(&self, name: &str) -> Result<NamedRef, GatewayError> {
        self.create_ref("/library/genres/", name).await
    }

    async fn rename_genre(&self, id: i64, name: &str) -> Result<NamedRef, GatewayError> {
        self.rename_ref(&format!("/library/genres/{id}/"), name)
            .await
    }

    async fn delete_genre(&self, id: i64) -> Result<(), GatewayError> {
        self.client
            .delete(self.client.url(&format!("/library/genres/{id}/")))
            .await
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::SortOrder;

    #[test]
    fn test_book_params_default_filter() {
        let params = book_params(&BookFilter::default());
        assert_eq!(params, vec![("sort_order", "asc".to_string())]);
    }

    #[test]
    fn test_book_params_full_filter() {
        let filter = BookFilter {
            search: Some("Шинель".to_string()),
            sort_order: SortOrder::Desc,
            author_id: Some(3),
            genre_id: Some(7),
        };
        let params = book_params(&filter);
        assert_eq!(
            params,
            vec![
                ("search", "Шинель".to_string()),
                ("sort_order", "desc".to_string()),
                ("author_id", "3".to_string()),
                ("genre_id", "7".to_string()),
            ]
        );
    }

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&[1, 2, 5]), "1,2,5");
        assert_eq!(join_ids(&[]), "");
    }
}
