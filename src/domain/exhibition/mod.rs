//! Exhibition Context - 展览限界上下文
//!
//! 职责:
//! - 展览聚合（栏目与内容块的本地镜像）
//! - 定向补丁操作（按 id 插入/替换/删除）
//! - 内容块类型与载荷值对象

mod aggregate;
mod entities;
mod value_objects;

pub use aggregate::Exhibition;
pub use entities::{ContentBlock, Section};
pub use value_objects::{BlockKind, BlockPayload, SectionTitle, Slug};
