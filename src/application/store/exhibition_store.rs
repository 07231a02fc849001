//! Exhibition Store - 展览状态容器
//!
//! 编辑器视图的单一数据源：当前展览快照 + 加载标志 + 错误文本。
//!
//! 并发约定:
//! - 锁内不 await，读操作返回克隆快照
//! - 所有变更调用共享同一个 loading 标志，除 UI 禁用外无其他并发保护
//! - 竞争时以最后落地的写入为准

use std::sync::RwLock;

use crate::domain::exhibition::{ContentBlock, Exhibition, Section};

#[derive(Debug, Default)]
struct StoreState {
    exhibition: Option<Exhibition>,
    loading: bool,
    error: Option<String>,
}

/// 展览状态容器
#[derive(Debug, Default)]
pub struct ExhibitionStore {
    state: RwLock<StoreState>,
}

impl ExhibitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前展览的克隆快照
    pub fn snapshot(&self) -> Option<Exhibition> {
        self.state.read().expect("store lock poisoned").exhibition.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().expect("store lock poisoned").loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().expect("store lock poisoned").error.clone()
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.write().expect("store lock poisoned").loading = loading;
    }

    pub fn set_error(&self, error: Option<String>) {
        self.state.write().expect("store lock poisoned").error = error;
    }

    /// 整体替换展览（初次加载与显式刷新）
    pub fn replace(&self, exhibition: Exhibition) {
        let mut state = self.state.write().expect("store lock poisoned");
        tracing::debug!(slug = %exhibition.slug, sections = exhibition.sections.len(), "Exhibition replaced");
        state.exhibition = Some(exhibition);
    }

    /// 清空展览（加载失败时）
    pub fn clear(&self) {
        self.state.write().expect("store lock poisoned").exhibition = None;
    }

    /// 所有 Book 块引用的图书 id（无展览时为空）
    pub fn referenced_book_ids(&self) -> Vec<i64> {
        self.state
            .read()
            .expect("store lock poisoned")
            .exhibition
            .as_ref()
            .map(|e| e.distinct_book_ids())
            .unwrap_or_default()
    }

    // ========================================================================
    // 定向补丁（变更响应按 id 合并，不整体重载）
    // ========================================================================

    pub fn upsert_section(&self, section: Section) -> bool {
        let mut state = self.state.write().expect("store lock poisoned");
        match state.exhibition.as_mut() {
            Some(exhibition) => {
                tracing::debug!(section_id = section.id, "Section patched into store");
                exhibition.upsert_section(section);
                true
            }
            None => false,
        }
    }

    pub fn remove_section(&self, section_id: i64) -> bool {
        let mut state = self.state.write().expect("store lock poisoned");
        state
            .exhibition
            .as_mut()
            .map(|e| e.remove_section(section_id))
            .unwrap_or(false)
    }

    pub fn upsert_block(&self, section_id: i64, block: ContentBlock) -> bool {
        let mut state = self.state.write().expect("store lock poisoned");
        match state.exhibition.as_mut() {
            Some(exhibition) => {
                tracing::debug!(section_id, block_id = block.id, "Block patched into store");
                exhibition.upsert_block(section_id, block)
            }
            None => false,
        }
    }

    pub fn remove_block(&self, section_id: i64, block_id: i64) -> bool {
        let mut state = self.state.write().expect("store lock poisoned");
        state
            .exhibition
            .as_mut()
            .map(|e| e.remove_block(section_id, block_id))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::exhibition::BlockKind;

    fn empty_exhibition() -> Exhibition {
        Exhibition {
            id: 1,
            title: "Лето".to_string(),
            slug: "leto".to_string(),
            image: None,
            description: None,
            is_published: false,
            created_at: None,
            published_at: None,
            sections: vec![],
        }
    }

    #[test]
    fn test_loading_and_error_flags() {
        let store = ExhibitionStore::new();
        assert!(!store.is_loading());
        assert!(store.error().is_none());

        store.set_loading(true);
        store.set_error(Some("Выставка не найдена".to_string()));
        assert!(store.is_loading());
        assert_eq!(store.error().as_deref(), Some("Выставка не найдена"));

        store.set_loading(false);
        store.set_error(None);
        assert!(!store.is_loading());
        assert!(store.error().is_none());
    }

    #[test]
    fn test_patches_are_noops_without_exhibition() {
        let store = ExhibitionStore::new();
        assert!(!store.upsert_section(Section {
            id: 1,
            title: "А".to_string(),
            content_blocks: vec![],
        }));
        assert!(!store.remove_section(1));
        assert!(!store.remove_block(1, 1));
        assert!(store.referenced_book_ids().is_empty());
    }

    #[test]
    fn test_replace_then_patch() {
        let store = ExhibitionStore::new();
        store.replace(empty_exhibition());

        assert!(store.upsert_section(Section {
            id: 1,
            title: "Новинки".to_string(),
            content_blocks: vec![],
        }));
        assert!(store.upsert_block(
            1,
            ContentBlock {
                id: 10,
                kind: BlockKind::Book,
                text_content: None,
                book_id: Some(5),
                order: 0,
            },
        ));

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.sections.len(), 1);
        assert_eq!(store.referenced_book_ids(), vec![5]);

        assert!(store.remove_block(1, 10));
        assert!(store.remove_section(1));
        assert!(store.snapshot().unwrap().sections.is_empty());
    }
}
