//! User Context - 用户限界上下文
//!
//! 职责:
//! - 用户记录与角色
//! - ФИО（姓名缩写）格式的本地校验

mod entities;
mod value_objects;

pub use entities::{User, UserRole};
pub use value_objects::validate_fullname;
