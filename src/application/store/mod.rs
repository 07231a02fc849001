//! Application Store - 共享状态容器
//!
//! 编辑器视图的单一数据源与图书元数据缓存

mod book_resolver;
mod exhibition_store;

pub use book_resolver::BookResolver;
pub use exhibition_store::ExhibitionStore;
