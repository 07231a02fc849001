//! Block Form - 内容块表单草稿
//!
//! 表单允许出现中间态（选了 Book 类型但还没选书）；
//! "类型与载荷互斥" 的不变量在提交时由 payload() 建立。

use crate::domain::exhibition::{BlockKind, BlockPayload, ContentBlock};

/// 内容块表单草稿
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockDraft {
    pub kind: BlockKind,
    /// 富文本 HTML（kind 为 Text 时有意义）
    pub text_content: String,
    /// 选中的图书 id（kind 为 Book 时有意义）
    pub book_id: Option<i64>,
}

impl BlockDraft {
    /// 新建文本块草稿
    pub fn text(html: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Text,
            text_content: html.into(),
            book_id: None,
        }
    }

    /// 新建图书块草稿
    pub fn book(book_id: i64) -> Self {
        Self {
            kind: BlockKind::Book,
            text_content: String::new(),
            book_id: Some(book_id),
        }
    }

    /// 图书块草稿（尚未选书）
    pub fn book_unselected() -> Self {
        Self {
            kind: BlockKind::Book,
            text_content: String::new(),
            book_id: None,
        }
    }

    /// 从已有块预填（编辑场景）
    pub fn from_block(block: &ContentBlock) -> Self {
        Self {
            kind: block.kind,
            text_content: block.text_content.clone().unwrap_or_default(),
            book_id: block.book_id,
        }
    }

    /// 切换类型（保留已填字段，与表单行为一致）
    pub fn set_kind(&mut self, kind: BlockKind) {
        self.kind = kind;
    }

    pub fn select_book(&mut self, book_id: i64) {
        self.book_id = Some(book_id);
    }

    /// 构建提交载荷
    ///
    /// Book 类型必须已选书，否则返回校验错误文本；
    /// Text 类型的空 HTML 放行，由后端校验
    pub fn payload(&self) -> Result<BlockPayload, &'static str> {
        match self.kind {
            BlockKind::Book => match self.book_id {
                Some(book_id) => Ok(BlockPayload::Book { book_id }),
                None => Err("Выберите книгу"),
            },
            BlockKind::Text => Ok(BlockPayload::Text {
                html: self.text_content.clone(),
            }),
        }
    }
}
