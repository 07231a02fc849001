//! Exhibition Context - Aggregate Root

use chrono::{DateTime, Utc};

use super::{BlockKind, ContentBlock, Section};

/// Exhibition 聚合根
///
/// 展览页面的完整本地镜像：元信息 + 栏目 + 内容块。
///
/// 不变量:
/// - 栏目与内容块的顺序由后端决定，补丁操作保持已有位置
/// - 新建实体追加到列表末尾（与后端插入顺序一致）
/// - 按 id 替换时不移动位置
#[derive(Debug, Clone, PartialEq)]
pub struct Exhibition {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub is_published: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub sections: Vec<Section>,
}

impl Exhibition {
    pub fn section(&self, section_id: i64) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    fn section_mut(&mut self, section_id: i64) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == section_id)
    }

    /// 插入或替换栏目：已存在则原位替换，否则追加
    pub fn upsert_section(&mut self, section: Section) {
        match self.section_mut(section.id) {
            Some(existing) => *existing = section,
            None => self.sections.push(section),
        }
    }

    /// 删除栏目，返回是否存在
    pub fn remove_section(&mut self, section_id: i64) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| s.id != section_id);
        self.sections.len() != before
    }

    /// 插入或替换内容块：已存在则原位替换，否则追加到栏目末尾
    ///
    /// 栏目不存在时不做任何修改，返回 false
    pub fn upsert_block(&mut self, section_id: i64, block: ContentBlock) -> bool {
        let Some(section) = self.section_mut(section_id) else {
            return false;
        };
        match section.content_blocks.iter_mut().find(|b| b.id == block.id) {
            Some(existing) => *existing = block,
            None => section.content_blocks.push(block),
        }
        true
    }

    /// 删除内容块，返回是否存在
    pub fn remove_block(&mut self, section_id: i64, block_id: i64) -> bool {
        let Some(section) = self.section_mut(section_id) else {
            return false;
        };
        let before = section.content_blocks.len();
        section.content_blocks.retain(|b| b.id != block_id);
        section.content_blocks.len() != before
    }

    /// 所有 Book 块引用的图书 id（去重，保持首次出现顺序）
    pub fn distinct_book_ids(&self) -> Vec<i64> {
        let mut ids = Vec::new();
        for section in &self.sections {
            for block in &section.content_blocks {
                if let Some(book_id) = block.referenced_book() {
                    if !ids.contains(&book_id) {
                        ids.push(book_id);
                    }
                }
            }
        }
        ids
    }

    /// 内容块总数（跨所有栏目）
    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|s| s.content_blocks.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_block(id: i64, html: &str) -> ContentBlock {
        ContentBlock {
            id,
            kind: BlockKind::Text,
            text_content: Some(html.to_string()),
            book_id: None,
            order: 0,
        }
    }

    fn book_block(id: i64, book_id: i64) -> ContentBlock {
        ContentBlock {
            id,
            kind: BlockKind::Book,
            text_content: None,
            book_id: Some(book_id),
            order: 0,
        }
    }

    fn exhibition_with_sections(sections: Vec<Section>) -> Exhibition {
        Exhibition {
            id: 1,
            title: "Лето".to_string(),
            slug: "leto".to_string(),
            image: None,
            description: None,
            is_published: true,
            created_at: None,
            published_at: None,
            sections,
        }
    }

    #[test]
    fn test_upsert_section_appends_then_replaces_in_place() {
        let mut exhibition = exhibition_with_sections(vec![
            Section {
                id: 1,
                title: "Первый".to_string(),
                content_blocks: vec![],
            },
            Section {
                id: 2,
                title: "Второй".to_string(),
                content_blocks: vec![],
            },
        ]);

        exhibition.upsert_section(Section {
            id: 3,
            title: "Третий".to_string(),
            content_blocks: vec![],
        });
        assert_eq!(exhibition.sections.len(), 3);
        assert_eq!(exhibition.sections[2].id, 3);

        // 替换 id=1 不改变位置
        exhibition.upsert_section(Section {
            id: 1,
            title: "Переименован".to_string(),
            content_blocks: vec![],
        });
        assert_eq!(exhibition.sections.len(), 3);
        assert_eq!(exhibition.sections[0].title, "Переименован");
    }

    #[test]
    fn test_remove_section() {
        let mut exhibition = exhibition_with_sections(vec![Section {
            id: 7,
            title: "Уходящий".to_string(),
            content_blocks: vec![],
        }]);

        assert!(exhibition.remove_section(7));
        assert!(!exhibition.remove_section(7));
        assert!(exhibition.sections.is_empty());
    }

    #[test]
    fn test_upsert_block_keeps_position_on_replace() {
        let mut exhibition = exhibition_with_sections(vec![Section {
            id: 1,
            title: "Блоки".to_string(),
            content_blocks: vec![text_block(10, "<p>a</p>"), text_block(11, "<p>b</p>")],
        }]);

        assert!(exhibition.upsert_block(1, text_block(10, "<p>новый</p>")));
        let section = exhibition.section(1).unwrap();
        assert_eq!(section.content_blocks.len(), 2);
        assert_eq!(
            section.content_blocks[0].text_content.as_deref(),
            Some("<p>новый</p>")
        );

        // 未知栏目 id 不修改状态
        assert!(!exhibition.upsert_block(99, text_block(12, "<p>c</p>")));
        assert_eq!(exhibition.block_count(), 2);
    }

    #[test]
    fn test_remove_block() {
        let mut exhibition = exhibition_with_sections(vec![Section {
            id: 1,
            title: "Блоки".to_string(),
            content_blocks: vec![book_block(10, 5)],
        }]);

        assert!(exhibition.remove_block(1, 10));
        assert!(!exhibition.remove_block(1, 10));
        assert_eq!(exhibition.block_count(), 0);
    }

    #[test]
    fn test_distinct_book_ids_deduplicates_across_sections() {
        let exhibition = exhibition_with_sections(vec![
            Section {
                id: 1,
                title: "А".to_string(),
                content_blocks: vec![book_block(10, 5), text_block(11, "<p></p>"), book_block(12, 3)],
            },
            Section {
                id: 2,
                title: "Б".to_string(),
                content_blocks: vec![book_block(20, 5), book_block(21, 8)],
            },
        ]);

        // 去重且保持首次出现顺序
        assert_eq!(exhibition.distinct_book_ids(), vec![5, 3, 8]);
    }

    #[test]
    fn test_text_block_without_book_id_is_not_referenced() {
        let exhibition = exhibition_with_sections(vec![Section {
            id: 1,
            title: "А".to_string(),
            content_blocks: vec![text_block(10, "<p>x</p>")],
        }]);
        assert!(exhibition.distinct_book_ids().is_empty());
    }
}
