//! User Context - Entities

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    /// 普通读者
    Reader,
    /// 图书管理员
    Librarian,
    /// 系统管理员
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Reader => "reader",
            UserRole::Librarian => "librarian",
            UserRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "reader" => Some(UserRole::Reader),
            "librarian" => Some(UserRole::Librarian),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Reader
    }
}

/// 用户记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// ФИО，格式 "Фамилия И.О."，可为空
    pub fullname: Option<String>,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [UserRole::Reader, UserRole::Librarian, UserRole::Admin] {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::from_str("root"), None);
    }
}
