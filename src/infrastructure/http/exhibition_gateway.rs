//! HTTP Exhibition Gateway - 展览网关适配器
//!
//! 通过 REST 后端实现 ExhibitionGatewayPort：
//! - 展览的分页列表、按 slug 获取、multipart 创建/更新、删除
//! - 栏目与内容块的增删改（JSON 请求体）

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::application::ports::{
    ExhibitionDraft, ExhibitionGatewayPort, ExhibitionPageQuery, ExhibitionSummary, GatewayError,
    Page,
};
use crate::domain::exhibition::{BlockPayload, ContentBlock, Exhibition, Section};

use super::client::RestClient;
use super::dto::{BlockBody, ContentBlockDto, ExhibitionDto, PageDto, SectionBody, SectionDto};

/// 展览资源的 HTTP 适配器
pub struct HttpExhibitionGateway {
    client: Arc<RestClient>,
}

impl HttpExhibitionGateway {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }

    /// 组装展览 multipart 表单，图片仅在提供时附带
    fn exhibition_form(draft: &ExhibitionDraft) -> Result<Form, GatewayError> {
        let mut form = Form::new()
            .text("title", draft.title.clone())
            .text("description", draft.description.clone())
            .text("is_published", draft.is_published.to_string());
        if let Some(image) = &draft.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime_type)
                .map_err(|e| GatewayError::Network(format!("Invalid image upload: {e}")))?;
            form = form.part("image", part);
        }
        Ok(form)
    }
}

/// 分页查询参数编码
///
/// page/size 恒有，published/search/日期区间仅在设置时附带，
/// 日期以 RFC 3339 发送。
fn page_params(query: &ExhibitionPageQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", query.page.to_string()),
        ("size", query.size.to_string()),
    ];
    if let Some(published) = query.published {
        params.push(("published", published.to_string()));
    }
    if let Some(search) = &query.search {
        params.push(("search", search.clone()));
    }
    if let Some(from) = &query.date_from {
        params.push(("date_from", from.to_rfc3339()));
    }
    if let Some(to) = &query.date_to {
        params.push(("date_to", to.to_rfc3339()));
    }
    params
}

#[async_trait]
impl ExhibitionGatewayPort for HttpExhibitionGateway {
    async fn fetch_by_slug(&self, slug: &str) -> Result<Exhibition, GatewayError> {
        debug!(slug = %slug, "Fetching exhibition");
        let dto: ExhibitionDto = self
            .client
            .get_json(self.client.url(&format!("/exhibitions/{slug}")), &[])
            .await?;
        dto.into_exhibition()
    }

    async fn list(
        &self,
        query: &ExhibitionPageQuery,
    ) -> Result<Page<ExhibitionSummary>, GatewayError> {
        let dto: PageDto<ExhibitionDto> = self
            .client
            .get_json(self.client.url("/exhibitionsPage/"), &page_params(query))
            .await?;
        Ok(dto.map(ExhibitionDto::into_summary))
    }

    async fn create(&self, draft: &ExhibitionDraft) -> Result<ExhibitionSummary, GatewayError> {
        let form = Self::exhibition_form(draft)?;
        let dto: ExhibitionDto = self
            .client
            .post_multipart(self.client.url("/exhibitions/"), form)
            .await?;
        Ok(dto.into_summary())
    }

    async fn update(
        &self,
        id: i64,
        draft: &ExhibitionDraft,
    ) -> Result<ExhibitionSummary, GatewayError> {
        let form = Self::exhibition_form(draft)?;
        let dto: ExhibitionDto = self
            .client
            .put_multipart(self.client.url(&format!("/exhibitions/{id}")), form)
            .await?;
        Ok(dto.into_summary())
    }

    async fn delete(&self, id: i64) -> Result<(), GatewayError> {
        self.client
            .delete(self.client.url(&format!("/exhibitions/{id}")))
            .await
    }

    async fn create_section(&self, slug: &str, title: &str) -> Result<Section, GatewayError> {
        let dto: SectionDto = self
            .client
            .post_json(
                self.client.url(&format!("/exhibitions/{slug}/sections")),
                &SectionBody { title },
            )
            .await?;
        dto.into_domain()
    }

    async fn rename_section(
        &self,
        slug: &str,
        section_id: i64,
        title: &str,
    ) -> Result<Section, GatewayError> {
        let dto: SectionDto = self
            .client
            .put_json(
                self.client
                    .url(&format!("/exhibitions/{slug}/sections/{section_id}")),
                &SectionBody { title },
            )
            .await?;
        dto.into_domain()
    }

    async fn delete_section(&self, slug: &str, section_id: i64) -> Result<(), GatewayError> {
        self.client
            .delete(
                self.client
                    .url(&format!("/exhibitions/{slug}/sections/{section_id}")),
            )
            .await
    }

    async fn create_block(
        &self,
        slug: &str,
        section_id: i64,
        payload: &BlockPayload,
    ) -> Result<ContentBlock, GatewayError> {
        let body = BlockBody {
            kind: payload.kind().as_str(),
            text_content: payload.text_content(),
            book_id: payload.book_id(),
        };
        let dto: ContentBlockDto = self
            .client
            .post_json(
                self.client
                    .url(&format!("/exhibitions/{slug}/sections/{section_id}/content")),
                &body,
            )
            .await?;
        dto.into_domain()
    }

    async fn update_block(
        &self,
        slug: &str,
        section_id: i64,
        block_id: i64,
        payload: &BlockPayload,
    ) -> Result<ContentBlock, GatewayError> {
        let body = BlockBody {
            kind: payload.kind().as_str(),
            text_content: payload.text_content(),
            book_id: payload.book_id(),
        };
        let dto: ContentBlockDto = self
            .client
            .put_json(
                self.client.url(&format!(
                    "/exhibitions/{slug}/sections/{section_id}/content/{block_id}"
                )),
                &body,
            )
            .await?;
        dto.into_domain()
    }

    async fn delete_block(
        &self,
        slug: &str,
        section_id: i64,
        block_id: i64,
    ) -> Result<(), GatewayError> {
        self.client
            .delete(self.client.url(&format!(
                "/exhibitions/{slug}/sections/{section_id}/content/{block_id}"
            )))
            .await
    }
}

// ============================================================================
// 测试
// ============================================================================
