//! Exhibition Context - Value Objects

/// 展览 slug（URL 标识）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    pub fn new(slug: impl Into<String>) -> Result<Self, &'static str> {
        let slug = slug.into();
        if slug.trim().is_empty() {
            return Err("Slug не указан");
        }
        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 栏目标题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTitle(String);

impl SectionTitle {
    pub fn new(title: impl Into<String>) -> Result<Self, &'static str> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err("Укажите название раздела");
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SectionTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 内容块类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// 富文本块
    Text,
    /// 图书引用块
    Book,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Book => "book",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "text" => Some(BlockKind::Text),
            "book" => Some(BlockKind::Book),
            _ => None,
        }
    }
}

impl Default for BlockKind {
    fn default() -> Self {
        BlockKind::Text
    }
}

/// 内容块提交载荷
///
/// 不变量:
/// - Text 只携带 HTML 文本，Book 只携带图书 id
/// - 该不变量由表单在提交时建立（见 application::editor::BlockDraft）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockPayload {
    Text { html: String },
    Book { book_id: i64 },
}

impl BlockPayload {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockPayload::Text { .. } => BlockKind::Text,
            BlockPayload::Book { .. } => BlockKind::Book,
        }
    }

    /// 线上格式中的 text_content 字段（Book 块为 null）
    pub fn text_content(&self) -> Option<&str> {
        match self {
            BlockPayload::Text { html } => Some(html),
            BlockPayload::Book { .. } => None,
        }
    }

    /// 线上格式中的 book_id 字段（Text 块为 null）
    pub fn book_id(&self) -> Option<i64> {
        match self {
            BlockPayload::Text { .. } => None,
            BlockPayload::Book { book_id } => Some(*book_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_rejects_empty() {
        assert!(Slug::new("").is_err());
        assert!(Slug::new("   ").is_err());
        assert_eq!(Slug::new("summer-2025").unwrap().as_str(), "summer-2025");
    }

    #[test]
    fn test_section_title_rejects_empty() {
        assert!(SectionTitle::new("").is_err());
        assert_eq!(SectionTitle::new("Новинки").unwrap().as_str(), "Новинки");
    }

    #[test]
    fn test_block_kind_roundtrip() {
        assert_eq!(BlockKind::from_str("text"), Some(BlockKind::Text));
        assert_eq!(BlockKind::from_str("book"), Some(BlockKind::Book));
        assert_eq!(BlockKind::from_str("video"), None);
        assert_eq!(BlockKind::Book.as_str(), "book");
    }

    #[test]
    fn test_payload_fields_are_exclusive() {
        let text = BlockPayload::Text {
            html: "<p>привет</p>".to_string(),
        };
        assert_eq!(text.kind(), BlockKind::Text);
        assert_eq!(text.text_content(), Some("<p>привет</p>"));
        assert_eq!(text.book_id(), None);

        let book = BlockPayload::Book { book_id: 5 };
        assert_eq!(book.kind(), BlockKind::Book);
        assert_eq!(book.text_content(), None);
        assert_eq!(book.book_id(), Some(5));
    }
}
