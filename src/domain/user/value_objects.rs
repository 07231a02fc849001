//! User Context - Value Objects

use regex::Regex;
use std::sync::OnceLock;

/// ФИО 格式: 西里尔姓氏 + 两个首字母缩写，如 "Федоров Н.С."
fn fullname_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[А-ЯЁ][а-яё]+ [А-ЯЁ]\.[А-ЯЁ]\.$").expect("fullname pattern is valid")
    })
}

/// 校验 ФИО 格式
///
/// 空字符串视为有效（表示未填写）；其余必须匹配 "Фамилия И.О." 格式
pub fn validate_fullname(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Ok(());
    }
    if fullname_pattern().is_match(value) {
        Ok(())
    } else {
        Err("ФИО должно быть в формате Фамилия И.О. (например, Федоров Н.С.)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fullname_is_valid() {
        assert!(validate_fullname("").is_ok());
        assert!(validate_fullname("   ").is_ok());
    }

    #[test]
    fn test_wellformed_fullname() {
        assert!(validate_fullname("Федоров Н.С.").is_ok());
        assert!(validate_fullname("Ёлкина Ё.Ё.").is_ok());
    }

    #[test]
    fn test_malformed_fullname() {
        assert!(validate_fullname("Федоров").is_err());
        assert!(validate_fullname("Федоров Н.С").is_err());
        assert!(validate_fullname("федоров Н.С.").is_err());
        assert!(validate_fullname("Fedorov N.S.").is_err());
        assert!(validate_fullname("Федоров Николай Сергеевич").is_err());
    }
}
