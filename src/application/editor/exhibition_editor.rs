//! Exhibition Editor - 展览编辑器
//!
//! 对一个展览（按 slug 标识）的栏目与内容块做增删改，
//! 变更响应定向合并进 ExhibitionStore，图书引用同步进 BookResolver。
//!
//! 并发约定:
//! - 所有变更共享 store 的单一 loading 标志，无取消、无超时（传输层超时除外）
//! - 快速连续提交可能交错，最后完成的响应决定最终状态
//! - 失败不重试，错误文本写入 store 供表单旁展示

use std::sync::Arc;

use crate::application::editor::BlockDraft;
use crate::application::error::ApplicationError;
use crate::application::ports::{ConfirmationPort, ExhibitionGatewayPort, GatewayError};
use crate::application::store::{BookResolver, ExhibitionStore};
use crate::domain::exhibition::{ContentBlock, Section, SectionTitle, Slug};

/// 展览编辑器
pub struct ExhibitionEditor {
    slug: Slug,
    gateway: Arc<dyn ExhibitionGatewayPort>,
    store: Arc<ExhibitionStore>,
    resolver: Arc<BookResolver>,
    confirmation: Arc<dyn ConfirmationPort>,
}

impl ExhibitionEditor {
    pub fn new(
        slug: Slug,
        gateway: Arc<dyn ExhibitionGatewayPort>,
        store: Arc<ExhibitionStore>,
        resolver: Arc<BookResolver>,
        confirmation: Arc<dyn ConfirmationPort>,
    ) -> Self {
        Self {
            slug,
            gateway,
            store,
            resolver,
            confirmation,
        }
    }

    pub fn slug(&self) -> &str {
        self.slug.as_str()
    }

    pub fn store(&self) -> &Arc<ExhibitionStore> {
        &self.store
    }

    pub fn resolver(&self) -> &Arc<BookResolver> {
        &self.resolver
    }

    /// 加载展览：成功整体替换 store，失败清空并记录错误
    pub async fn load(&self) -> Result<(), ApplicationError> {
        self.store.set_loading(true);
        self.store.set_error(None);
        let result = self.gateway.fetch_by_slug(self.slug.as_str()).await;
        self.store.set_loading(false);

        match result {
            Ok(exhibition) => {
                let book_ids = exhibition.distinct_book_ids();
                tracing::info!(
                    slug = %self.slug,
                    sections = exhibition.sections.len(),
                    books = book_ids.len(),
                    "Exhibition loaded"
                );
                self.store.replace(exhibition);
                self.resolver.resolve(&book_ids).await;
                Ok(())
            }
            Err(err) => {
                self.store.clear();
                Err(self.gateway_failure(err))
            }
        }
    }

    /// 显式整体刷新
    pub async fn refresh(&self) -> Result<(), ApplicationError> {
        self.load().await
    }

    /// 创建栏目，成功后把返回的栏目合并进 store
    pub async fn create_section(&self, title: &str) -> Result<Section, ApplicationError> {
        let title = match SectionTitle::new(title) {
            Ok(title) => title,
            Err(message) => return Err(self.reject(message)),
        };

        self.store.set_loading(true);
        self.store.set_error(None);
        let result = self
            .gateway
            .create_section(self.slug.as_str(), title.as_str())
            .await;
        self.store.set_loading(false);

        match result {
            Ok(section) => {
                tracing::info!(section_id = section.id, "Section created");
                self.store.upsert_section(section.clone());
                Ok(section)
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    /// 重命名栏目
    pub async fn rename_section(
        &self,
        section_id: i64,
        title: &str,
    ) -> Result<Section, ApplicationError> {
        let title = match SectionTitle::new(title) {
            Ok(title) => title,
            Err(message) => return Err(self.reject(message)),
        };

        self.store.set_loading(true);
        self.store.set_error(None);
        let result = self
            .gateway
            .rename_section(self.slug.as_str(), section_id, title.as_str())
            .await;
        self.store.set_loading(false);

        match result {
            Ok(section) => {
                tracing::info!(section_id = section.id, "Section renamed");
                self.store.upsert_section(section.clone());
                Ok(section)
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    /// 保存内容块：existing_block_id 为 None 时新建（POST），否则更新（PUT）
    ///
    /// Book 类型未选书时记录校验错误且不发请求
    pub async fn save_block(
        &self,
        section_id: i64,
        draft: &BlockDraft,
        existing_block_id: Option<i64>,
    ) -> Result<ContentBlock, ApplicationError> {
        let payload = match draft.payload() {
            Ok(payload) => payload,
            Err(message) => return Err(self.reject(message)),
        };

        self.store.set_loading(true);
        self.store.set_error(None);
        let result = match existing_block_id {
            Some(block_id) => {
                self.gateway
                    .update_block(self.slug.as_str(), section_id, block_id, &payload)
                    .await
            }
            None => {
                self.gateway
                    .create_block(self.slug.as_str(), section_id, &payload)
                    .await
            }
        };
        self.store.set_loading(false);

        match result {
            Ok(block) => {
                tracing::info!(
                    section_id,
                    block_id = block.id,
                    kind = block.kind.as_str(),
                    "Block saved"
                );
                self.store.upsert_block(section_id, block.clone());
                if let Some(book_id) = block.referenced_book() {
                    self.resolver.resolve(&[book_id]).await;
                }
                Ok(block)
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    /// 删除栏目：先确认，拒绝时返回 Ok(false) 且不发请求
    pub async fn delete_section(&self, section_id: i64) -> Result<bool, ApplicationError> {
        if !self.confirmation.confirm("Удалить раздел?").await {
            return Ok(false);
        }

        self.store.set_loading(true);
        self.store.set_error(None);
        let result = self.gateway.delete_section(self.slug.as_str(), section_id).await;
        self.store.set_loading(false);

        match result {
            Ok(()) => {
                tracing::info!(section_id, "Section deleted");
                self.store.remove_section(section_id);
                Ok(true)
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    /// 删除内容块：先确认，拒绝时返回 Ok(false) 且不发请求
    pub async fn delete_block(
        &self,
        section_id: i64,
        block_id: i64,
    ) -> Result<bool, ApplicationError> {
        if !self.confirmation.confirm("Удалить блок?").await {
            return Ok(false);
        }

        self.store.set_loading(true);
        self.store.set_error(None);
        let result = self
            .gateway
            .delete_block(self.slug.as_str(), section_id, block_id)
            .await;
        self.store.set_loading(false);

        match result {
            Ok(()) => {
                tracing::info!(section_id, block_id, "Block deleted");
                self.store.remove_block(section_id, block_id);
                Ok(true)
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    /// 记录校验错误（不发请求）
    fn reject(&self, message: &str) -> ApplicationError {
        let err = ApplicationError::validation(message);
        self.store.set_error(Some(err.user_message()));
        err
    }

    /// 记录网关错误
    fn gateway_failure(&self, err: GatewayError) -> ApplicationError {
        tracing::warn!(slug = %self.slug, error = %err, "Editor operation failed");
        let err = ApplicationError::from(err);
        self.store.set_error(Some(err.user_message()));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::exhibition::{BlockKind, Exhibition};
    use crate::domain::library::{Book, NamedRef};
    use crate::infrastructure::memory::{
        InMemoryExhibitionGateway, InMemoryLibraryGateway, StaticConfirmation,
    };

    fn seeded_exhibition() -> Exhibition {
        Exhibition {
            id: 1,
            title: "Летняя выставка".to_string(),
            slug: "leto".to_string(),
            image: None,
            description: Some("Книги к лету".to_string()),
            is_published: true,
            created_at: None,
            published_at: None,
            sections: vec![Section {
                id: 1,
                title: "Новинки".to_string(),
                content_blocks: vec![ContentBlock {
                    id: 10,
                    kind: BlockKind::Book,
                    text_content: None,
                    book_id: Some(5),
                    order: 0,
                }],
            }],
        }
    }

    struct Fixture {
        gateway: Arc<InMemoryExhibitionGateway>,
        library: Arc<InMemoryLibraryGateway>,
        store: Arc<ExhibitionStore>,
        confirmation: Arc<StaticConfirmation>,
        editor: ExhibitionEditor,
    }

    fn fixture(confirm_answer: bool) -> Fixture {
        let gateway = Arc::new(InMemoryExhibitionGateway::new());
        gateway.put_exhibition(seeded_exhibition());

        let library = Arc::new(InMemoryLibraryGateway::new());
        library.put_book(Book {
            id: 5,
            title: "Книга 5".to_string(),
            annotations: None,
            library_description: None,
            image_url: None,
            year_of_publication: None,
            authors: vec![NamedRef::new(1, "Автор А.А.")],
            genres: vec![],
        });

        let store = Arc::new(ExhibitionStore::new());
        let resolver = Arc::new(BookResolver::new(library.clone()));
        let confirmation = Arc::new(StaticConfirmation::new(confirm_answer));
        let editor = ExhibitionEditor::new(
            Slug::new("leto").unwrap(),
            gateway.clone(),
            store.clone(),
            resolver,
            confirmation.clone(),
        );
        Fixture {
            gateway,
            library,
            store,
            confirmation,
            editor,
        }
    }

    #[tokio::test]
    async fn test_load_replaces_store_and_resolves_books() {
        let f = fixture(true);
        f.editor.load().await.unwrap();

        let snapshot = f.store.snapshot().unwrap();
        assert_eq!(snapshot.slug, "leto");
        assert_eq!(snapshot.sections.len(), 1);
        assert!(f.editor.resolver().contains(5));
        assert!(!f.store.is_loading());
        assert!(f.store.error().is_none());
    }

    #[tokio::test]
    async fn test_load_failure_sets_error_and_clears_state() {
        let f = fixture(true);
        let editor = ExhibitionEditor::new(
            Slug::new("net-takogo").unwrap(),
            f.gateway.clone(),
            f.store.clone(),
            Arc::new(BookResolver::new(f.library.clone())),
            f.confirmation.clone(),
        );

        let err = editor.load().await.unwrap_err();
        assert!(matches!(err, ApplicationError::Gateway(_)));
        assert!(f.store.snapshot().is_none());
        assert!(f.store.error().is_some());
        assert!(!f.store.is_loading());
    }

    #[tokio::test]
    async fn test_book_block_without_selection_issues_no_request() {
        let f = fixture(true);
        f.editor.load().await.unwrap();
        let mutations_before = f.gateway.mutation_count();

        let draft = BlockDraft::book_unselected();
        let err = f.editor.save_block(1, &draft, None).await.unwrap_err();

        assert!(matches!(err, ApplicationError::Validation(_)));
        assert_eq!(f.store.error().as_deref(), Some("Выберите книгу"));
        assert_eq!(f.gateway.mutation_count(), mutations_before);
    }

    #[tokio::test]
    async fn test_created_section_appears_without_full_reload() {
        let f = fixture(true);
        f.editor.load().await.unwrap();
        assert_eq!(f.gateway.fetch_count(), 1);

        let section = f.editor.create_section("Классика").await.unwrap();

        let snapshot = f.store.snapshot().unwrap();
        assert!(snapshot.sections.iter().any(|s| s.id == section.id));
        // 没有触发第二次整体加载
        assert_eq!(f.gateway.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_section_title_is_rejected_locally() {
        let f = fixture(true);
        f.editor.load().await.unwrap();
        let mutations_before = f.gateway.mutation_count();

        let err = f.editor.create_section("   ").await.unwrap_err();
        assert!(matches!(err, ApplicationError::Validation(_)));
        assert_eq!(f.gateway.mutation_count(), mutations_before);
    }

    #[tokio::test]
    async fn test_declined_delete_changes_nothing_and_sends_nothing() {
        let f = fixture(false);
        f.editor.load().await.unwrap();
        let before = f.store.snapshot().unwrap();
        let mutations_before = f.gateway.mutation_count();

        let deleted = f.editor.delete_block(1, 10).await.unwrap();

        assert!(!deleted);
        assert_eq!(f.store.snapshot().unwrap(), before);
        assert_eq!(f.gateway.mutation_count(), mutations_before);
        assert_eq!(f.confirmation.prompts(), vec!["Удалить блок?".to_string()]);
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_block() {
        let f = fixture(true);
        f.editor.load().await.unwrap();

        let deleted = f.editor.delete_block(1, 10).await.unwrap();

        assert!(deleted);
        let snapshot = f.store.snapshot().unwrap();
        assert!(snapshot.section(1).unwrap().content_blocks.is_empty());
    }

    #[tokio::test]
    async fn test_saved_book_block_is_patched_and_resolved() {
        let f = fixture(true);
        f.editor.load().await.unwrap();

        let draft = BlockDraft::book(5);
        let block = f.editor.save_block(1, &draft, None).await.unwrap();

        let snapshot = f.store.snapshot().unwrap();
        let section = snapshot.section(1).unwrap();
        assert!(section.block(block.id).is_some());
        assert_eq!(section.content_blocks.len(), 2);
        assert!(f.editor.resolver().contains(5));
    }

    #[tokio::test]
    async fn test_edited_text_block_keeps_position() {
        let f = fixture(true);
        f.editor.load().await.unwrap();
        f.editor
            .save_block(1, &BlockDraft::text("<p>старый</p>"), None)
            .await
            .unwrap();
        let block_id = {
            let snapshot = f.store.snapshot().unwrap();
            snapshot.section(1).unwrap().content_blocks[1].id
        };

        f.editor
            .save_block(1, &BlockDraft::text("<p>новый</p>"), Some(block_id))
            .await
            .unwrap();

        let snapshot = f.store.snapshot().unwrap();
        let section = snapshot.section(1).unwrap();
        assert_eq!(section.content_blocks.len(), 2);
        assert_eq!(
            section.content_blocks[1].text_content.as_deref(),
            Some("<p>новый</p>")
        );
    }

    #[tokio::test]
    async fn test_server_error_surfaces_detail_in_store() {
        let f = fixture(true);
        f.editor.load().await.unwrap();
        f.gateway.fail_next(GatewayError::server(
            http::StatusCode::UNPROCESSABLE_ENTITY,
            "Раздел с таким названием уже существует",
        ));

        let err = f.editor.create_section("Новинки").await.unwrap_err();

        assert!(matches!(err, ApplicationError::Gateway(_)));
        assert_eq!(
            f.store.error().as_deref(),
            Some("Раздел с таким названием уже существует")
        );
    }
}
