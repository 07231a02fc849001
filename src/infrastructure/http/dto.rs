//! Wire DTO - 后端 /v2 API 的序列化形状
//!
//! 响应 DTO 对缺失字段保持宽容（#[serde(default)]），时间戳先以
//! 字符串接收再做宽松解析：带时区的 RFC 3339 或后端常见的
//! 无时区 ISO 格式（按 UTC 解释）。
//! DTO 与领域类型的转换也集中在这里。

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::ports::{ExhibitionSummary, GatewayError, Page};
use crate::domain::exhibition::{BlockKind, ContentBlock, Exhibition, Section};
use crate::domain::library::{Book, NamedRef};
use crate::domain::user::{User, UserRole};

// ============================================================================
// 响应 DTO
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PageDto<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> PageDto<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExhibitionDto {
    pub id: i64,
    pub title: String,
    /// 部分后端版本的响应模型不含 slug
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub is_published: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub sections: Vec<SectionDto>,
}

#[derive(Debug, Deserialize)]
pub struct SectionDto {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content_blocks: Vec<ContentBlockDto>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlockDto {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text_content: Option<String>,
    #[serde(default)]
    pub book_id: Option<i64>,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Deserialize)]
pub struct NamedRefDto {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct BookDto {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub annotations: Option<String>,
    #[serde(default)]
    pub library_description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub year_of_publication: Option<String>,
    #[serde(default)]
    pub authors: Vec<NamedRefDto>,
    #[serde(default)]
    pub genres: Vec<NamedRefDto>,
}

#[derive(Debug, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub fullname: Option<String>,
    pub role: String,
}

// ============================================================================
// 请求体
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SectionBody<'a> {
    pub title: &'a str,
}

/// 内容块请求体，线上格式与响应一致
#[derive(Debug, Serialize)]
pub struct BlockBody<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub text_content: Option<&'a str>,
    pub book_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct NameBody<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UserPatchBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'a str>,
}

// ============================================================================
// DTO -> 领域类型
// ============================================================================

/// 宽松解析后端时间戳
///
/// 依次尝试 RFC 3339 与无时区的 ISO 格式（按 UTC 解释），
/// 都失败时返回 None 而不是报错。
pub(crate) fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

impl ContentBlockDto {
    pub fn into_domain(self) -> Result<ContentBlock, GatewayError> {
        let kind = BlockKind::from_str(&self.kind).ok_or_else(|| {
            GatewayError::InvalidResponse(format!("unknown block type: {}", self.kind))
        })?;
        Ok(ContentBlock {
            id: self.id,
            kind,
            text_content: self.text_content,
            book_id: self.book_id,
            order: self.order,
        })
    }
}

impl SectionDto {
    pub fn into_domain(self) -> Result<Section, GatewayError> {
        let content_blocks = self
            .content_blocks
            .into_iter()
            .map(ContentBlockDto::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Section {
            id: self.id,
            title: self.title,
            content_blocks,
        })
    }
}

impl ExhibitionDto {
    pub fn into_exhibition(self) -> Result<Exhibition, GatewayError> {
        let sections = self
            .sections
            .into_iter()
            .map(SectionDto::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Exhibition {
            id: self.id,
            title: self.title,
            slug: self.slug,
            image: self.image,
            description: self.description,
            is_published: self.is_published,
            created_at: self.created_at.as_deref().and_then(parse_datetime),
            published_at: self.published_at.as_deref().and_then(parse_datetime),
            sections,
        })
    }

    /// 列表项视角：丢弃栏目
    pub fn into_summary(self) -> ExhibitionSummary {
        ExhibitionSummary {
            id: self.id,
            title: self.title,
            slug: self.slug,
            image: self.image,
            description: self.description,
            is_published: self.is_published,
            created_at: self.created_at.as_deref().and_then(parse_datetime),
            published_at: self.published_at.as_deref().and_then(parse_datetime),
        }
    }
}

impl From<NamedRefDto> for NamedRef {
    fn from(dto: NamedRefDto) -> Self {
        NamedRef {
            id: dto.id,
            name: dto.name,
        }
    }
}

impl From<BookDto> for Book {
    fn from(dto: BookDto) -> Self {
        Book {
            id: dto.id,
            title: dto.title,
            annotations: dto.annotations,
            library_description: dto.library_description,
            image_url: dto.image_url,
            year_of_publication: dto.year_of_publication,
            authors: dto.authors.into_iter().map(NamedRef::from).collect(),
            genres: dto.genres.into_iter().map(NamedRef::from).collect(),
        }
    }
}

impl UserDto {
    pub fn into_domain(self) -> Result<User, GatewayError> {
        let role = UserRole::from_str(&self.role)
            .ok_or_else(|| GatewayError::InvalidResponse(format!("unknown role: {}", self.role)))?;
        Ok(User {
            id: self.id,
            username: self.username,
            fullname: self.fullname,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_rfc3339() {
        let parsed = parse_datetime("2024-05-12T10:30:00+03:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-05-12T07:30:00+00:00");
    }

    #[test]
    fn test_parse_datetime_naive_assumes_utc() {
        let parsed = parse_datetime("2024-05-12T10:30:00.123456").unwrap();
        assert_eq!(parsed.date_naive().to_string(), "2024-05-12");
        assert_eq!(parsed.timestamp_subsec_micros(), 123_456);
    }

    #[test]
    fn test_parse_datetime_garbage_is_none() {
        assert!(parse_datetime("вчера").is_none());
    }

    #[test]
    fn test_block_dto_rejects_unknown_type() {
        let dto = ContentBlockDto {
            id: 1,
            kind: "video".to_string(),
            text_content: None,
            book_id: None,
            order: 0,
        };
        assert!(dto.into_domain().is_err());
    }

    #[test]
    fn test_exhibition_dto_maps_sections() {
        let json = r#"{
            "id": 7,
            "title": "Пушкин 225",
            "slug": "pushkin-225",
            "image": "/static/exh/7.jpg",
            "description": null,
            "is_published": true,
            "created_at": "2024-05-12T10:30:00",
            "sections": [
                {"id": 1, "title": "Лирика", "content_blocks": [
                    {"id": 10, "type": "text", "text_content": "<p>стихи</p>", "book_id": null, "order": 0},
                    {"id": 11, "type": "book", "text_content": null, "book_id": 5, "order": 1}
                ]}
            ]
        }"#;
        let dto: ExhibitionDto = serde_json::from_str(json).unwrap();
        let exhibition = dto.into_exhibition().unwrap();

        assert_eq!(exhibition.slug, "pushkin-225");
        assert!(exhibition.created_at.is_some());
        assert_eq!(exhibition.sections.len(), 1);
        let blocks = &exhibition.sections[0].content_blocks;
        assert_eq!(blocks[0].kind, BlockKind::Text);
        assert_eq!(blocks[1].referenced_book(), Some(5));
    }

    #[test]
    fn test_user_patch_body_skips_absent_fields() {
        let body = UserPatchBody {
            username: None,
            fullname: Some("Федоров Н.С."),
            role: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"fullname":"Федоров Н.С."}"#);
    }
}
