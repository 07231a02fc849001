//! Library Context - Entities

/// 扁平引用实体（作者/体裁共用同一形状）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

impl NamedRef {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// 图书目录记录（列表与编辑表单使用的完整形状）
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub annotations: Option<String>,
    pub library_description: Option<String>,
    pub image_url: Option<String>,
    /// 后端以字符串存储出版年份
    pub year_of_publication: Option<String>,
    pub authors: Vec<NamedRef>,
    pub genres: Vec<NamedRef>,
}

/// 解析后的图书元数据（内容块展示使用的精简形状）
///
/// 作者与体裁只保留名称；封面 URL 在解析时统一升级为 https
#[derive(Debug, Clone, PartialEq)]
pub struct BookInfo {
    pub id: i64,
    pub title: String,
    pub cover_url: Option<String>,
    pub authors: Vec<String>,
    pub genres: Vec<String>,
    pub year_of_publication: Option<String>,
}

impl BookInfo {
    /// 将 http:// 封面升级为 https://（后端历史数据混用两种协议）
    pub fn with_https_cover(mut self) -> Self {
        if let Some(url) = self.cover_url.take() {
            self.cover_url = Some(upgrade_to_https(url));
        }
        self
    }
}

impl From<Book> for BookInfo {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            cover_url: book.image_url,
            authors: book.authors.into_iter().map(|a| a.name).collect(),
            genres: book.genres.into_iter().map(|g| g.name).collect(),
            year_of_publication: book.year_of_publication,
        }
    }
}

fn upgrade_to_https(url: String) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url,
    }
}
