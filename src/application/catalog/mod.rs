//! 目录浏览与维护模型

mod book_catalog;
mod exhibition_catalog;

pub use book_catalog::BookCatalog;
pub use exhibition_catalog::ExhibitionCatalog;
