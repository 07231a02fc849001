//! HTTP Layer - REST 后端适配器
//!
//! 基于 reqwest 的出站网关实现，按资源拆分：
//! 展览、图书馆、用户管理各一个适配器，共享同一个 RestClient

pub mod admin_gateway;
pub mod client;
pub mod dto;
pub mod exhibition_gateway;
pub mod library_gateway;

pub use admin_gateway::HttpAdminGateway;
pub use client::{RestClient, RestClientConfig};
pub use exhibition_gateway::HttpExhibitionGateway;
pub use library_gateway::HttpLibraryGateway;
