//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod console;
pub mod http;
pub mod memory;

pub use console::TerminalConfirmation;
pub use http::{
    HttpAdminGateway, HttpExhibitionGateway, HttpLibraryGateway, RestClient, RestClientConfig,
};
pub use memory::{
    InMemoryAdminGateway, InMemoryExhibitionGateway, InMemoryLibraryGateway, StaticConfirmation,
};
