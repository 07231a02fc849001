//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（展览/图书/用户网关、确认端口）
//! - store: 共享状态容器（展览快照、图书信息缓存）
//! - editor: 展览构造器与图书表单
//! - search: 防抖搜索控件（自动补全、选书弹窗）
//! - catalog: 目录浏览与维护
//! - admin: 用户管理
//! - error: 应用层错误定义

pub mod admin;
pub mod catalog;
pub mod editor;
pub mod error;
pub mod ports;
pub mod search;
pub mod store;

// Re-exports
pub use admin::UserAdmin;

pub use catalog::{BookCatalog, ExhibitionCatalog};

pub use editor::{BlockDraft, BookForm, BookFormEditor, ExhibitionEditor};

pub use error::ApplicationError;

pub use ports::{
    // Admin gateway
    AdminGatewayPort,
    UserPatch,
    // Confirmation
    ConfirmationPort,
    // Exhibition gateway
    ExhibitionDraft,
    ExhibitionGatewayPort,
    ExhibitionPageQuery,
    ExhibitionSummary,
    GatewayError,
    ImageUpload,
    Page,
    // Library gateway
    BookDraft,
    BookFilter,
    LibraryGatewayPort,
    SortOrder,
};

pub use search::{Autocomplete, BookPicker, SearchScope, SelectionMode};

pub use store::{BookResolver, ExhibitionStore};
