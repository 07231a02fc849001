//! Vitrina - 图书馆虚拟展览前端核心
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Exhibition Context: 展览聚合（栏目、内容块）
//! - Library Context: 图书目录（图书、作者、体裁）
//! - User Context: 用户与角色
//!
//! 应用层 (application/):
//! - Ports: 端口定义（ExhibitionGateway, LibraryGateway, AdminGateway, Confirmation）
//! - Editor: 展览编辑器与图书表单
//! - Store: 展览快照与图书引用缓存
//! - Search: 防抖联想输入与选书器
//! - Catalog: 图书/展览目录浏览
//! - Admin: 用户管理
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: reqwest 实现的后端网关
//! - Memory: 网关内存替身（测试与离线运行）
//! - Console: 终端删除确认

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
