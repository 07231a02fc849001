//! Exhibition Context - Entities
//!
//! 实体是后端数据的本地镜像，字段公开。唯一 id 与 book_id 的引用
//! 有效性由后端保证，客户端不做关系校验。

use super::BlockKind;

/// 内容块 - 栏目内的最小展示单位
///
/// 不变量:
/// - kind 为 Text 时 text_content 有意义，kind 为 Book 时 book_id 有意义
/// - 该不变量仅在表单提交时建立，实体本身不强制
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub id: i64,
    pub kind: BlockKind,
    pub text_content: Option<String>,
    pub book_id: Option<i64>,
    /// 后端分配的排序号，客户端只读
    pub order: i64,
}

impl ContentBlock {
    /// 块引用的图书 id（仅 Book 块返回 Some）
    pub fn referenced_book(&self) -> Option<i64> {
        match self.kind {
            BlockKind::Book => self.book_id,
            BlockKind::Text => None,
        }
    }
}

/// 栏目 - 展览页面的一个区块
///
/// 内容块顺序 = 后端返回的数组顺序，客户端不重排
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: i64,
    pub title: String,
    pub content_blocks: Vec<ContentBlock>,
}

impl Section {
    pub fn block(&self, block_id: i64) -> Option<&ContentBlock> {
        self.content_blocks.iter().find(|b| b.id == block_id)
    }
}
