//! Book Form - 图书表单
//!
//! 创建/编辑图书的表单模型：标题、注释、馆藏描述、出版年份、
//! 作者/体裁多选、封面图片。提交走 multipart。
//!
//! 本地校验（不发请求）：标题、至少一位作者、至少一个体裁。

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{BookDraft, ImageUpload, LibraryGatewayPort};
use crate::domain::library::{Book, NamedRef};

/// 图书表单
#[derive(Debug, Clone, Default)]
pub struct BookForm {
    pub title: String,
    pub annotations: String,
    pub library_description: String,
    pub year_of_publication: String,
    pub authors: Vec<NamedRef>,
    pub genres: Vec<NamedRef>,
    pub image: Option<ImageUpload>,
}

impl BookForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从已有图书预填（编辑场景，图片置空等待重新选择）
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            annotations: book.annotations.clone().unwrap_or_default(),
            library_description: book.library_description.clone().unwrap_or_default(),
            year_of_publication: book.year_of_publication.clone().unwrap_or_default(),
            authors: book.authors.clone(),
            genres: book.genres.clone(),
            image: None,
        }
    }

    /// 添加作者到选中列表（按 id 去重）
    pub fn add_author(&mut self, author: NamedRef) {
        if !self.authors.iter().any(|a| a.id == author.id) {
            self.authors.push(author);
        }
    }

    pub fn remove_author(&mut self, author_id: i64) {
        self.authors.retain(|a| a.id != author_id);
    }

    /// 添加体裁到选中列表（按 id 去重）
    pub fn add_genre(&mut self, genre: NamedRef) {
        if !self.genres.iter().any(|g| g.id == genre.id) {
            self.genres.push(genre);
        }
    }

    pub fn remove_genre(&mut self, genre_id: i64) {
        self.genres.retain(|g| g.id != genre_id);
    }

    /// 构建提交草稿；必填字段缺失时返回校验错误文本
    pub fn draft(&self) -> Result<BookDraft, &'static str> {
        if self.title.trim().is_empty() || self.authors.is_empty() || self.genres.is_empty() {
            return Err("Заполните обязательные поля: название, авторы, жанры.");
        }
        Ok(BookDraft {
            title: self.title.clone(),
            annotations: self.annotations.clone(),
            library_description: self.library_description.clone(),
            year_of_publication: if self.year_of_publication.trim().is_empty() {
                None
            } else {
                Some(self.year_of_publication.clone())
            },
            author_ids: self.authors.iter().map(|a| a.id).collect(),
            genre_ids: self.genres.iter().map(|g| g.id).collect(),
            image: self.image.clone(),
        })
    }
}

/// 图书表单编辑器：表单提交与作者/体裁快速创建
pub struct BookFormEditor {
    gateway: Arc<dyn LibraryGatewayPort>,
}

impl BookFormEditor {
    pub fn new(gateway: Arc<dyn LibraryGatewayPort>) -> Self {
        Self { gateway }
    }

    /// 提交新图书；校验失败不发请求
    pub async fn submit_new(&self, form: &BookForm) -> Result<Book, ApplicationError> {
        let draft = form.draft().map_err(ApplicationError::validation)?;
        let book = self.gateway.create_book(&draft).await?;
        tracing::info!(book_id = book.id, title = %book.title, "Book created");
        Ok(book)
    }

    /// 提交对已有图书的修改；校验失败不发请求
    pub async fn submit_update(&self, book_id: i64, form: &BookForm) -> Result<Book, ApplicationError> {
        let draft = form.draft().map_err(ApplicationError::validation)?;
        let book = self.gateway.update_book(book_id, &draft).await?;
        tracing::info!(book_id = book.id, "Book updated");
        Ok(book)
    }

    /// 从表单快速创建作者并加入选中列表
    pub async fn quick_create_author(
        &self,
        form: &mut BookForm,
        name: &str,
    ) -> Result<Option<NamedRef>, ApplicationError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let author = self.gateway.create_author(name).await?;
        tracing::info!(author_id = author.id, "Author created from book form");
        form.add_author(author.clone());
        Ok(Some(author))
    }

    /// 从表单快速创建体裁并加入选中列表
    pub async fn quick_create_genre(
        &self,
        form: &mut BookForm,
        name: &str,
    ) -> Result<Option<NamedRef>, ApplicationError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let genre = self.gateway.create_genre(name).await?;
        tracing::info!(genre_id = genre.id, "Genre created from book form");
        form.add_genre(genre.clone());
        Ok(Some(genre))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryLibraryGateway;

    fn filled_form() -> BookForm {
        let mut form = BookForm::new();
        form.title = "Мёртвые души".to_string();
        form.add_author(NamedRef::new(1, "Гоголь Н.В."));
        form.add_genre(NamedRef::new(2, "Поэма"));
        form
    }

    #[test]
    fn test_draft_requires_title_authors_genres() {
        let mut form = filled_form();
        assert!(form.draft().is_ok());

        form.title = "  ".to_string();
        assert_eq!(
            form.draft(),
            Err("Заполните обязательные поля: название, авторы, жанры.")
        );

        form = filled_form();
        form.remove_author(1);
        assert!(form.draft().is_err());

        form = filled_form();
        form.remove_genre(2);
        assert!(form.draft().is_err());
    }

    #[test]
    fn test_author_selection_deduplicates_by_id() {
        let mut form = filled_form();
        form.add_author(NamedRef::new(1, "Гоголь Н.В."));
        assert_eq!(form.authors.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_issues_no_request() {
        let gateway = Arc::new(InMemoryLibraryGateway::new());
        let editor = BookFormEditor::new(gateway.clone());

        let err = editor.submit_new(&BookForm::new()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Validation(_)));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_new_creates_book() {
        let gateway = Arc::new(InMemoryLibraryGateway::new());
        let editor = BookFormEditor::new(gateway.clone());

        let book = editor.submit_new(&filled_form()).await.unwrap();
        assert_eq!(book.title, "Мёртвые души");
        assert_eq!(book.authors.len(), 1);
    }

    #[tokio::test]
    async fn test_quick_create_author_appends_to_selection() {
        let gateway = Arc::new(InMemoryLibraryGateway::new());
        let editor = BookFormEditor::new(gateway.clone());
        let mut form = filled_form();

        let created = editor
            .quick_create_author(&mut form, "  Чехов А.П.  ")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.name, "Чехов А.П.");
        assert_eq!(form.authors.len(), 2);

        // 空名称：不发请求
        let calls = gateway.call_count();
        assert!(editor
            .quick_create_author(&mut form, "   ")
            .await
            .unwrap()
            .is_none());
        assert_eq!(gateway.call_count(), calls);
    }
}
