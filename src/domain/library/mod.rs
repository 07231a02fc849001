//! Library Context - 图书目录限界上下文
//!
//! 职责:
//! - 图书目录记录与解析后的展示元数据
//! - 作者/体裁扁平引用实体

mod entities;

pub use entities::{Book, BookInfo, NamedRef};
