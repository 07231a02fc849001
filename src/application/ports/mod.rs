//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod confirmation;
mod gateways;

pub use confirmation::ConfirmationPort;
pub use gateways::{
    AdminGatewayPort, BookDraft, BookFilter, ExhibitionDraft, ExhibitionGatewayPort,
    ExhibitionPageQuery, ExhibitionSummary, GatewayError, ImageUpload, LibraryGatewayPort, Page,
    SortOrder, UserPatch,
};
