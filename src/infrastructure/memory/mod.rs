//! Memory Layer - In-Memory Gateway Fakes
//!
//! 三个网关端口与确认端口的内存实现，语义对齐真实后端，
//! 供应用层测试与离线运行使用

mod admin_gateway;
mod confirmation;
mod exhibition_gateway;
mod library_gateway;

pub use admin_gateway::InMemoryAdminGateway;
pub use confirmation::StaticConfirmation;
pub use exhibition_gateway::InMemoryExhibitionGateway;
pub use library_gateway::InMemoryLibraryGateway;
