//! Application Editor - 表单与编辑流程
//!
//! 包含：
//! - block_form: 内容块表单草稿与提交校验
//! - exhibition_editor: 展览栏目/内容块编辑流程
//! - book_form: 图书表单与作者/体裁快速创建

mod block_form;
mod book_form;
mod exhibition_editor;

pub use block_form::BlockDraft;
pub use book_form::{BookForm, BookFormEditor};
pub use exhibition_editor::ExhibitionEditor;
