//! Gateway Ports - 出站端口
//!
//! 定义对后端 /v2 REST API 的抽象接口
//! 具体实现在 infrastructure 层（HTTP 适配器与内存假实现）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use http::StatusCode;
use thiserror::Error;

use crate::domain::exhibition::{BlockPayload, ContentBlock, Exhibition, Section};
use crate::domain::library::{Book, BookInfo, NamedRef};
use crate::domain::user::{User, UserRole};

/// 网关错误
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP {status}: {detail}")]
    Server { status: StatusCode, detail: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    pub fn server(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::Server {
            status,
            detail: detail.into(),
        }
    }
}

// ============================================================================
// Exhibition Gateway
// ============================================================================

/// 分页响应封套
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// 展览列表项（不含栏目）
#[derive(Debug, Clone, PartialEq)]
pub struct ExhibitionSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub is_published: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
}

/// 展览分页查询参数
#[derive(Debug, Clone, Default)]
pub struct ExhibitionPageQuery {
    pub page: u32,
    pub size: u32,
    pub search: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    /// None = 不过滤发布状态
    pub published: Option<bool>,
}

impl ExhibitionPageQuery {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            ..Default::default()
        }
    }
}

/// 上传的图片文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// 展览创建/更新草稿（multipart 提交）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExhibitionDraft {
    pub title: String,
    pub description: String,
    pub is_published: bool,
    /// 创建时必填（由后端校验），更新时可选
    pub image: Option<ImageUpload>,
}

/// Exhibition Gateway Port
///
/// 展览资源及其栏目/内容块的后端访问接口
#[async_trait]
pub trait ExhibitionGatewayPort: Send + Sync {
    /// 按 slug 获取完整展览（含栏目与内容块）
    async fn fetch_by_slug(&self, slug: &str) -> Result<Exhibition, GatewayError>;

    /// 分页列出展览
    async fn list(&self, query: &ExhibitionPageQuery) -> Result<Page<ExhibitionSummary>, GatewayError>;

    /// 创建展览（multipart）
    async fn create(&self, draft: &ExhibitionDraft) -> Result<ExhibitionSummary, GatewayError>;

    /// 更新展览（multipart，图片可选）
    async fn update(&self, id: i64, draft: &ExhibitionDraft) -> Result<ExhibitionSummary, GatewayError>;

    /// 删除展览
    async fn delete(&self, id: i64) -> Result<(), GatewayError>;

    /// 创建栏目
    async fn create_section(&self, slug: &str, title: &str) -> Result<Section, GatewayError>;

    /// 重命名栏目
    async fn rename_section(
        &self,
        slug: &str,
        section_id: i64,
        title: &str,
    ) -> Result<Section, GatewayError>;

    /// 删除栏目
    async fn delete_section(&self, slug: &str, section_id: i64) -> Result<(), GatewayError>;

    /// 创建内容块
    async fn create_block(
        &self,
        slug: &str,
        section_id: i64,
        payload: &BlockPayload,
    ) -> Result<ContentBlock, GatewayError>;

    /// 更新内容块
    async fn update_block(
        &self,
        slug: &str,
        section_id: i64,
        block_id: i64,
        payload: &BlockPayload,
    ) -> Result<ContentBlock, GatewayError>;

    /// 删除内容块
    async fn delete_block(
        &self,
        slug: &str,
        section_id: i64,
        block_id: i64,
    ) -> Result<(), GatewayError>;
}

// ============================================================================
// Library Gateway
// ============================================================================

/// 图书排序方向（按标题）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Asc
    }
}

/// 图书列表过滤条件
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub search: Option<String>,
    pub sort_order: SortOrder,
    pub author_id: Option<i64>,
    pub genre_id: Option<i64>,
}

/// 图书创建/更新草稿（multipart 提交）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub annotations: String,
    pub library_description: String,
    /// 后端以字符串接收出版年份
    pub year_of_publication: Option<String>,
    pub author_ids: Vec<i64>,
    pub genre_ids: Vec<i64>,
    /// 创建时必填（由后端校验），更新时可选
    pub image: Option<ImageUpload>,
}

/// Library Gateway Port
///
/// 图书目录与作者/体裁引用实体的后端访问接口
#[async_trait]
pub trait LibraryGatewayPort: Send + Sync {
    /// 获取单本图书的展示元数据
    async fn fetch_book(&self, id: i64) -> Result<BookInfo, GatewayError>;

    /// 按过滤条件列出图书
    async fn list_books(&self, filter: &BookFilter) -> Result<Vec<Book>, GatewayError>;

    /// 创建图书（multipart）
    async fn create_book(&self, draft: &BookDraft) -> Result<Book, GatewayError>;

    /// 更新图书（multipart，图片可选）
    async fn update_book(&self, id: i64, draft: &BookDraft) -> Result<Book, GatewayError>;

    /// 删除图书
    async fn delete_book(&self, id: i64) -> Result<(), GatewayError>;

    /// 列出全部作者
    async fn list_authors(&self) -> Result<Vec<NamedRef>, GatewayError>;

    /// 列出全部体裁
    async fn list_genres(&self) -> Result<Vec<NamedRef>, GatewayError>;

    /// 按前缀搜索作者
    async fn search_authors(&self, query: &str) -> Result<Vec<NamedRef>, GatewayError>;

    /// 按前缀搜索体裁
    async fn search_genres(&self, query: &str) -> Result<Vec<NamedRef>, GatewayError>;

    async fn create_author(&self, name: &str) -> Result<NamedRef, GatewayError>;

    async fn rename_author(&self, id: i64, name: &str) -> Result<NamedRef, GatewayError>;

    async fn delete_author(&self, id: i64) -> Result<(), GatewayError>;

    async fn create_genre(&self, name: &str) -> Result<NamedRef, GatewayError>;

    async fn rename_genre(&self, id: i64, name: &str) -> Result<NamedRef, GatewayError>;

    async fn delete_genre(&self, id: i64) -> Result<(), GatewayError>;
}

// ============================================================================
// Admin Gateway
// ============================================================================

/// 用户部分更新（仅携带要变更的字段）
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub fullname: Option<String>,
    pub role: Option<UserRole>,
}

impl UserPatch {
    pub fn fullname(value: impl Into<String>) -> Self {
        Self {
            fullname: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn role(role: UserRole) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }

    pub fn username(value: impl Into<String>) -> Self {
        Self {
            username: Some(value.into()),
            ..Default::default()
        }
    }
}

/// Admin Gateway Port
///
/// 用户管理的后端访问接口
#[async_trait]
pub trait AdminGatewayPort: Send + Sync {
    /// 列出所有用户
    async fn list_users(&self) -> Result<Vec<User>, GatewayError>;

    /// 部分更新用户
    async fn update_user(&self, id: i64, patch: &UserPatch) -> Result<User, GatewayError>;

    /// 删除用户
    async fn delete_user(&self, id: i64) -> Result<(), GatewayError>;
}
