//! In-Memory Exhibition Gateway Implementation
//!
//! 后端展览 API 的内存替身：按 id 保存完整聚合，
//! 分页/过滤语义与真实后端一致。带调用计数与单次错误注入，供测试观察。

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::DashMap;
use http::StatusCode;

use crate::application::ports::{
    ExhibitionDraft, ExhibitionGatewayPort, ExhibitionPageQuery, ExhibitionSummary, GatewayError,
    Page,
};
use crate::domain::exhibition::{BlockPayload, ContentBlock, Exhibition, Section};

/// 内存展览网关
pub struct InMemoryExhibitionGateway {
    exhibitions: DashMap<i64, Exhibition>,
    next_id: AtomicI64,
    fetches: AtomicUsize,
    lists: AtomicUsize,
    mutations: AtomicUsize,
    fail_next: Mutex<Option<GatewayError>>,
}

impl InMemoryExhibitionGateway {
    pub fn new() -> Self {
        Self {
            exhibitions: DashMap::new(),
            // 与测试夹具中手工分配的小 id 错开
            next_id: AtomicI64::new(1000),
            fetches: AtomicUsize::new(0),
            lists: AtomicUsize::new(0),
            mutations: AtomicUsize::new(0),
            fail_next: Mutex::new(None),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 预置一个展览（id 与 slug 由调用方给定）
    pub fn put_exhibition(&self, exhibition: Exhibition) {
        self.exhibitions.insert(exhibition.id, exhibition);
    }

    /// fetch_by_slug 的累计调用次数
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// list 的累计调用次数
    pub fn list_call_count(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    /// 变更类方法（创建/更新/删除及栏目块操作）的累计调用次数
    pub fn mutation_count(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    /// 让下一次网关调用失败并返回给定错误
    pub fn fail_next(&self, err: GatewayError) {
        *self.fail_next.lock().expect("fail_next lock poisoned") = Some(err);
    }

    fn take_failure(&self) -> Result<(), GatewayError> {
        match self
            .fail_next
            .lock()
            .expect("fail_next lock poisoned")
            .take()
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn alloc_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn not_found(what: &str) -> GatewayError {
        GatewayError::server(StatusCode::NOT_FOUND, format!("{what} not found"))
    }

    fn find_by_slug(&self, slug: &str) -> Option<Exhibition> {
        self.exhibitions
            .iter()
            .find(|entry| entry.value().slug == slug)
            .map(|entry| entry.value().clone())
    }

    fn with_exhibition<R>(
        &self,
        slug: &str,
        f: impl FnOnce(&mut Exhibition) -> Result<R, GatewayError>,
    ) -> Result<R, GatewayError> {
        let id = self
            .exhibitions
            .iter()
            .find(|entry| entry.value().slug == slug)
            .map(|entry| *entry.key())
            .ok_or_else(|| Self::not_found("Exhibition"))?;
        let mut entry = self
            .exhibitions
            .get_mut(&id)
            .ok_or_else(|| Self::not_found("Exhibition"))?;
        f(entry.value_mut())
    }

    fn summary_of(exhibition: &Exhibition) -> ExhibitionSummary {
        ExhibitionSummary {
            id: exhibition.id,
            title: exhibition.title.clone(),
            slug: exhibition.slug.clone(),
            image: exhibition.image.clone(),
            description: exhibition.description.clone(),
            is_published: exhibition.is_published,
            created_at: exhibition.created_at,
            published_at: exhibition.published_at,
        }
    }

    fn matches(exhibition: &Exhibition, query: &ExhibitionPageQuery) -> bool {
        if let Some(published) = query.published {
            if exhibition.is_published != published {
                return false;
            }
        }
        if let Some(search) = &query.search {
            let needle = search.to_lowercase();
            if !exhibition.title.to_lowercase().contains(&needle) {
                return false;
            }
        }
        // 日期区间作用于发布时间，未发布的条目不命中
        if query.date_from.is_some() || query.date_to.is_some() {
            let Some(published_at) = exhibition.published_at else {
                return false;
            };
            if let Some(from) = query.date_from {
                if published_at < from {
                    return false;
                }
            }
            if let Some(to) = query.date_to {
                if published_at > to {
                    return false;
                }
            }
        }
        true
    }
}

impl Default for InMemoryExhibitionGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExhibitionGatewayPort for InMemoryExhibitionGateway {
    async fn fetch_by_slug(&self, slug: &str) -> Result<Exhibition, GatewayError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        self.find_by_slug(slug)
            .ok_or_else(|| Self::not_found("Exhibition"))
    }

    async fn list(
        &self,
        query: &ExhibitionPageQuery,
    ) -> Result<Page<ExhibitionSummary>, GatewayError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;

        let mut matched: Vec<ExhibitionSummary> = self
            .exhibitions
            .iter()
            .filter(|entry| Self::matches(entry.value(), query))
            .map(|entry| Self::summary_of(entry.value()))
            .collect();
        matched.sort_by_key(|summary| summary.id);

        let total = matched.len() as u64;
        let size = query.size.max(1);
        let total_pages = ((total + u64::from(size) - 1) / u64::from(size)).max(1) as u32;
        let start = (query.page.saturating_sub(1) as usize) * size as usize;
        let items = if start >= matched.len() {
            Vec::new()
        } else {
            matched[start..(start + size as usize).min(matched.len())].to_vec()
        };

        Ok(Page {
            items,
            page: query.page,
            size,
            total,
            total_pages,
        })
    }

    async fn create(&self, draft: &ExhibitionDraft) -> Result<ExhibitionSummary, GatewayError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;

        let id = self.alloc_id();
        let exhibition = Exhibition {
            id,
            title: draft.title.clone(),
            slug: format!("exhibition-{id}"),
            image: draft.image.as_ref().map(|i| i.file_name.clone()),
            description: Some(draft.description.clone()),
            is_published: draft.is_published,
            created_at: None,
            published_at: None,
            sections: Vec::new(),
        };
        let summary = Self::summary_of(&exhibition);
        self.exhibitions.insert(id, exhibition);
        Ok(summary)
    }

    async fn update(
        &self,
        id: i64,
        draft: &ExhibitionDraft,
    ) -> Result<ExhibitionSummary, GatewayError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;

        let mut entry = self
            .exhibitions
            .get_mut(&id)
            .ok_or_else(|| Self::not_found("Exhibition"))?;
        let exhibition = entry.value_mut();
        exhibition.title = draft.title.clone();
        exhibition.description = Some(draft.description.clone());
        exhibition.is_published = draft.is_published;
        if let Some(image) = &draft.image {
            exhibition.image = Some(image.file_name.clone());
        }
        Ok(Self::summary_of(exhibition))
    }

    async fn delete(&self, id: i64) -> Result<(), GatewayError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        self.exhibitions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found("Exhibition"))
    }

    async fn create_section(&self, slug: &str, title: &str) -> Result<Section, GatewayError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;

        let section = Section {
            id: self.alloc_id(),
            title: title.to_string(),
            content_blocks: Vec::new(),
        };
        self.with_exhibition(slug, |exhibition| {
            exhibition.sections.push(section.clone());
            Ok(section)
        })
    }

    async fn rename_section(
        &self,
        slug: &str,
        section_id: i64,
        title: &str,
    ) -> Result<Section, GatewayError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;

        self.with_exhibition(slug, |exhibition| {
            let section = exhibition
                .sections
                .iter_mut()
                .find(|s| s.id == section_id)
                .ok_or_else(|| Self::not_found("Section"))?;
            section.title = title.to_string();
            Ok(section.clone())
        })
    }

    async fn delete_section(&self, slug: &str, section_id: i64) -> Result<(), GatewayError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;

        self.with_exhibition(slug, |exhibition| {
            if exhibition.remove_section(section_id) {
                Ok(())
            } else {
                Err(Self::not_found("Section"))
            }
        })
    }

    async fn create_block(
        &self,
        slug: &str,
        section_id: i64,
        payload: &BlockPayload,
    ) -> Result<ContentBlock, GatewayError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;

        let id = self.alloc_id();
        self.with_exhibition(slug, |exhibition| {
            let section = exhibition
                .sections
                .iter_mut()
                .find(|s| s.id == section_id)
                .ok_or_else(|| Self::not_found("Section"))?;
            let block = ContentBlock {
                id,
                kind: payload.kind(),
                text_content: payload.text_content().map(str::to_string),
                book_id: payload.book_id(),
                order: section.content_blocks.len() as i64,
            };
            section.content_blocks.push(block.clone());
            Ok(block)
        })
    }

    async fn update_block(
        &self,
        slug: &str,
        section_id: i64,
        block_id: i64,
        payload: &BlockPayload,
    ) -> Result<ContentBlock, GatewayError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;

        self.with_exhibition(slug, |exhibition| {
            let section = exhibition
                .sections
                .iter_mut()
                .find(|s| s.id == section_id)
                .ok_or_else(|| Self::not_found("Section"))?;
            let block = section
                .content_blocks
                .iter_mut()
                .find(|b| b.id == block_id)
                .ok_or_else(|| Self::not_found("Content block"))?;
            block.kind = payload.kind();
            block.text_content = payload.text_content().map(str::to_string);
            block.book_id = payload.book_id();
            Ok(block.clone())
        })
    }

    async fn delete_block(
        &self,
        slug: &str,
        section_id: i64,
        block_id: i64,
    ) -> Result<(), GatewayError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;

        self.with_exhibition(slug, |exhibition| {
            if exhibition.remove_block(section_id, block_id) {
                Ok(())
            } else {
                Err(Self::not_found("Content block"))
            }
        })
    }
}
