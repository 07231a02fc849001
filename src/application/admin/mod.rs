//! 用户管理模型

mod user_admin;

pub use user_admin::UserAdmin;
