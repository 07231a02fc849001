//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Exhibition Context: 展览页面管理
//! - Library Context: 图书目录（图书/作者/体裁）
//! - User Context: 用户管理

pub mod exhibition;
pub mod library;
pub mod user;
