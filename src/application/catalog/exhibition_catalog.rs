//! Exhibition Catalog - 展览目录模型
//!
//! 职责：
//! - 分页浏览展览列表，支持搜索、发布日期区间、发布状态过滤
//! - 页码钳制：页码至少为 1；响应报告的总页数小于请求页码时，
//!   自动改请求最后一页并重查一次
//! - 创建/更新展览（multipart 表单），标题为本地必填项
//! - 删除展览先询问确认，成功后重查当前页

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::application::error::ApplicationError;
use crate::application::ports::{
    ConfirmationPort, ExhibitionDraft, ExhibitionGatewayPort, ExhibitionPageQuery,
    ExhibitionSummary, GatewayError, Page,
};

#[derive(Debug, Default)]
struct CatalogState {
    query: ExhibitionPageQuery,
    items: Vec<ExhibitionSummary>,
    total: u64,
    total_pages: u32,
    loading: bool,
    error: Option<String>,
}

/// 展览目录模型
pub struct ExhibitionCatalog {
    gateway: Arc<dyn ExhibitionGatewayPort>,
    confirmation: Arc<dyn ConfirmationPort>,
    state: Mutex<CatalogState>,
}

impl ExhibitionCatalog {
    pub fn new(
        gateway: Arc<dyn ExhibitionGatewayPort>,
        confirmation: Arc<dyn ConfirmationPort>,
        query: ExhibitionPageQuery,
    ) -> Self {
        Self {
            gateway,
            confirmation,
            state: Mutex::new(CatalogState {
                query,
                total_pages: 1,
                ..Default::default()
            }),
        }
    }

    // ========================================================================
    // 加载与分页
    // ========================================================================

    /// 加载当前页
    ///
    /// 页码先钳制到 ≥1。响应的总页数小于请求页码时（例如最后一页的
    /// 唯一条目刚被删掉），改用最后一页再查一次。
    pub async fn load(&self) -> Result<(), ApplicationError> {
        let query = {
            let mut state = self.lock_state();
            state.loading = true;
            state.error = None;
            if state.query.page == 0 {
                state.query.page = 1;
            }
            state.query.clone()
        };

        let first = match self.gateway.list(&query).await {
            Ok(page) => page,
            Err(err) => return Err(self.gateway_failure(err)),
        };

        let last_page = first.total_pages.max(1);
        let page = if query.page > last_page {
            let retry = {
                let mut state = self.lock_state();
                state.query.page = last_page;
                state.query.clone()
            };
            match self.gateway.list(&retry).await {
                Ok(page) => page,
                Err(err) => return Err(self.gateway_failure(err)),
            }
        } else {
            first
        };

        self.apply_page(page);
        Ok(())
    }

    pub async fn set_page(&self, page: u32) -> Result<(), ApplicationError> {
        {
            let mut state = self.lock_state();
            state.query.page = page.max(1);
        }
        self.load().await
    }

    pub async fn next_page(&self) -> Result<(), ApplicationError> {
        let page = {
            let state = self.lock_state();
            state.query.page.saturating_add(1).min(state.total_pages.max(1))
        };
        self.set_page(page).await
    }

    pub async fn prev_page(&self) -> Result<(), ApplicationError> {
        let page = self.lock_state().query.page.saturating_sub(1);
        self.set_page(page).await
    }

    /// 更换搜索词并回到第一页
    pub async fn set_search(&self, text: &str) -> Result<(), ApplicationError> {
        {
            let mut state = self.lock_state();
            state.query.search = if text.trim().is_empty() {
                None
            } else {
                Some(text.to_string())
            };
            state.query.page = 1;
        }
        self.load().await
    }

    /// 更换发布日期区间
    pub async fn set_date_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<(), ApplicationError> {
        {
            let mut state = self.lock_state();
            state.query.date_from = from;
            state.query.date_to = to;
        }
        self.load().await
    }

    // ========================================================================
    // 增删改
    // ========================================================================

    /// 创建展览；标题为空时拒绝，不发请求
    pub async fn create(
        &self,
        draft: &ExhibitionDraft,
    ) -> Result<ExhibitionSummary, ApplicationError> {
        if draft.title.trim().is_empty() {
            return Err(self.reject("Укажите название выставки"));
        }
        match self.gateway.create(draft).await {
            Ok(created) => {
                tracing::info!(exhibition_id = created.id, title = %created.title, "exhibition created");
                self.load().await?;
                Ok(created)
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    /// 更新展览；标题为空时拒绝，不发请求
    pub async fn update(
        &self,
        id: i64,
        draft: &ExhibitionDraft,
    ) -> Result<ExhibitionSummary, ApplicationError> {
        if draft.title.trim().is_empty() {
            return Err(self.reject("Укажите название выставки"));
        }
        match self.gateway.update(id, draft).await {
            Ok(updated) => {
                tracing::info!(exhibition_id = updated.id, "exhibition updated");
                self.load().await?;
                Ok(updated)
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    /// 删除展览：先询问确认；拒绝时返回 Ok(false)
    pub async fn delete(&self, id: i64) -> Result<bool, ApplicationError> {
        if !self
            .confirmation
            .confirm("Вы уверены, что хотите удалить эту выставку?")
            .await
        {
            return Ok(false);
        }
        match self.gateway.delete(id).await {
            Ok(()) => {
                tracing::info!(exhibition_id = id, "exhibition deleted");
                self.load().await?;
                Ok(true)
            }
            Err(err) => Err(self.gateway_failure(err)),
        }
    }

    // ========================================================================
    // 状态读取
    // ========================================================================

    pub fn items(&self) -> Vec<ExhibitionSummary> {
        self.lock_state().items.clone()
    }

    pub fn page(&self) -> u32 {
        self.lock_state().query.page
    }

    pub fn total_pages(&self) -> u32 {
        self.lock_state().total_pages
    }

    pub fn total(&self) -> u64 {
        self.lock_state().total
    }

    pub fn query(&self) -> ExhibitionPageQuery {
        self.lock_state().query.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock_state().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock_state().error.clone()
    }

    fn apply_page(&self, page: Page<ExhibitionSummary>) {
        let mut state = self.lock_state();
        state.loading = false;
        state.query.page = page.page.max(1);
        state.total = page.total;
        state.total_pages = page.total_pages.max(1);
        state.items = page.items;
    }

    fn reject(&self, message: &str) -> ApplicationError {
        let err = ApplicationError::validation(message);
        let mut state = self.lock_state();
        state.loading = false;
        state.error = Some(message.to_string());
        err
    }

    fn gateway_failure(&self, err: GatewayError) -> ApplicationError {
        let err = ApplicationError::Gateway(err);
        tracing::warn!(error = %err, "exhibition catalog request failed");
        let mut state = self.lock_state();
        state.loading = false;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ImageUpload;
    use crate::domain::exhibition::Exhibition;
    use crate::infrastructure::memory::{InMemoryExhibitionGateway, StaticConfirmation};

    fn sample_exhibition(id: i64, title: &str, slug: &str) -> Exhibition {
        Exhibition {
            id,
            title: title.to_string(),
            slug: slug.to_string(),
            image: None,
            description: Some("описание".to_string()),
            is_published: true,
            created_at: None,
            published_at: None,
            sections: Vec::new(),
        }
    }

    fn catalog(
        gateway: Arc<InMemoryExhibitionGateway>,
        confirm: bool,
    ) -> (ExhibitionCatalog, Arc<StaticConfirmation>) {
        let confirmation = Arc::new(StaticConfirmation::new(confirm));
        (
            ExhibitionCatalog::new(
                gateway,
                confirmation.clone(),
                ExhibitionPageQuery::new(1, 10),
            ),
            confirmation,
        )
    }

    #[tokio::test]
    async fn test_load_fills_current_page() {
        let gateway = Arc::new(InMemoryExhibitionGateway::new());
        gateway.put_exhibition(sample_exhibition(1, "Пушкин 225", "pushkin-225"));
        gateway.put_exhibition(sample_exhibition(2, "Блокада", "blokada"));
        let (catalog, _) = catalog(gateway, true);

        catalog.load().await.unwrap();

        assert_eq!(catalog.items().len(), 2);
        assert_eq!(catalog.page(), 1);
        assert_eq!(catalog.total(), 2);
        assert_eq!(catalog.total_pages(), 1);
    }

    #[tokio::test]
    async fn test_page_beyond_last_refetches_last_page() {
        let gateway = Arc::new(InMemoryExhibitionGateway::new());
        gateway.put_exhibition(sample_exhibition(1, "Пушкин 225", "pushkin-225"));
        let (catalog, _) = catalog(gateway.clone(), true);

        catalog.set_page(5).await.unwrap();

        // 第一次查询发现只有一页，随后自动改查最后一页
        assert_eq!(gateway.list_call_count(), 2);
        assert_eq!(catalog.page(), 1);
        assert_eq!(catalog.items().len(), 1);
    }

    #[tokio::test]
    async fn test_page_zero_is_clamped_to_one() {
        let gateway = Arc::new(InMemoryExhibitionGateway::new());
        gateway.put_exhibition(sample_exhibition(1, "Пушкин 225", "pushkin-225"));
        let (catalog, _) = catalog(gateway.clone(), true);

        catalog.set_page(0).await.unwrap();

        assert_eq!(catalog.page(), 1);
        assert_eq!(gateway.list_call_count(), 1);
    }

    #[tokio::test]
    async fn test_search_change_resets_to_first_page() {
        let gateway = Arc::new(InMemoryExhibitionGateway::new());
        for i in 0..15 {
            gateway.put_exhibition(sample_exhibition(
                i + 1,
                &format!("Выставка {}", i + 1),
                &format!("vystavka-{}", i + 1),
            ));
        }
        let (catalog, _) = catalog(gateway, true);
        catalog.set_page(2).await.unwrap();
        assert_eq!(catalog.page(), 2);

        catalog.set_search("Выставка 3").await.unwrap();

        assert_eq!(catalog.page(), 1);
        assert_eq!(catalog.items().len(), 1);
    }

    #[tokio::test]
    async fn test_create_without_title_sends_nothing() {
        let gateway = Arc::new(InMemoryExhibitionGateway::new());
        let (catalog, _) = catalog(gateway.clone(), true);

        let result = catalog.create(&ExhibitionDraft::default()).await;

        assert!(result.is_err());
        assert_eq!(gateway.mutation_count(), 0);
        assert_eq!(catalog.error().as_deref(), Some("Укажите название выставки"));
    }

    #[tokio::test]
    async fn test_create_reloads_list() {
        let gateway = Arc::new(InMemoryExhibitionGateway::new());
        let (catalog, _) = catalog(gateway, true);
        catalog.load().await.unwrap();

        let draft = ExhibitionDraft {
            title: "Серебряный век".to_string(),
            description: "поэзия".to_string(),
            is_published: false,
            image: Some(ImageUpload {
                file_name: "cover.jpg".to_string(),
                mime_type: "image/jpeg".to_string(),
                bytes: vec![0xff, 0xd8],
            }),
        };
        let created = catalog.create(&draft).await.unwrap();

        assert!(created.id > 0);
        assert_eq!(catalog.items().len(), 1);
        assert_eq!(catalog.items()[0].title, "Серебряный век");
    }

    #[tokio::test]
    async fn test_delete_declined_keeps_item() {
        let gateway = Arc::new(InMemoryExhibitionGateway::new());
        gateway.put_exhibition(sample_exhibition(1, "Пушкин 225", "pushkin-225"));
        let (catalog, confirmation) = catalog(gateway.clone(), false);
        catalog.load().await.unwrap();
        let calls_before = gateway.list_call_count();

        let deleted = catalog.delete(1).await.unwrap();

        assert!(!deleted);
        assert_eq!(catalog.items().len(), 1);
        assert_eq!(gateway.list_call_count(), calls_before);
        assert_eq!(
            confirmation.prompts(),
            vec!["Вы уверены, что хотите удалить эту выставку?".to_string()]
        );
    }

    #[tokio::test]
    async fn test_delete_confirmed_removes_and_reloads() {
        let gateway = Arc::new(InMemoryExhibitionGateway::new());
        gateway.put_exhibition(sample_exhibition(1, "Пушкин 225", "pushkin-225"));
        let (catalog, _) = catalog(gateway, true);
        catalog.load().await.unwrap();

        let deleted = catalog.delete(1).await.unwrap();

        assert!(deleted);
        assert!(catalog.items().is_empty());
    }
}
