//! 切点（Pointcut）匹配
//!
//! 切点模式是针对规范键 `"<TypeName> <methodName>"` 的正则表达式。
//! 模式始终从键首锚定；末尾的 `$` 会被剥掉，再以 `^(?:...)$` 包裹，
//! 保证含分支的模式同样要求整键匹配

use regex::Regex;

/// 编译后的切点模式
#[derive(Debug, Clone)]
pub struct Pointcut {
    pattern: String,
    regex: Regex,
}

impl Pointcut {
    /// 编译切点模式，编译失败属于配置错误
    pub fn new(pattern: impl Into<String>) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let anchored = format!("^(?:{})$", strip_trailing_anchors(&pattern));
        let regex = Regex::new(&anchored)?;
        Ok(Self { pattern, regex })
    }

    /// 原始模式文本
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// 匹配类型名与方法名组成的规范键
    pub fn matches(&self, target_type: &str, method_name: &str) -> bool {
        self.matches_key(&advice_key(target_type, method_name))
    }

    /// 匹配已经拼好的规范键
    pub fn matches_key(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

/// 拼装规范键 `"<TypeName> <methodName>"`
pub fn advice_key(target_type: &str, method_name: &str) -> String {
    format!("{} {}", target_type, method_name)
}

/// 剥掉末尾的结束锚
///
/// 只剥真正的锚：`\$` 是字面美元符号，必须保留；反斜杠自身也可能
/// 被转义，所以按前导反斜杠的奇偶性判断
fn strip_trailing_anchors(pattern: &str) -> &str {
    let mut end = pattern.len();
    while let Some(rest) = pattern[..end].strip_suffix('$') {
        let backslashes = rest.chars().rev().take_while(|c| *c == '\\').count();
        if backslashes % 2 == 1 {
            break;
        }
        end = rest.len();
    }
    &pattern[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let pointcut = Pointcut::new("UserService get_user").unwrap();
        assert!(pointcut.matches("UserService", "get_user"));
        assert!(!pointcut.matches("OrderService", "get_user"));
    }

    #[test]
    fn test_implicit_end_anchor() {
        // 没有显式结束锚也不允许前缀匹配
        let pointcut = Pointcut::new("UserService get_user").unwrap();
        assert!(!pointcut.matches("UserService", "get_user_by_id"));
    }

    #[test]
    fn test_start_anchored() {
        let pointcut = Pointcut::new("Service .*").unwrap();
        assert!(!pointcut.matches("UserService", "get_user"));
    }

    #[test]
    fn test_wildcard_methods() {
        let pointcut = Pointcut::new("UserService .*").unwrap();
        assert!(pointcut.matches("UserService", "save"));
        assert!(pointcut.matches("UserService", "delete_all"));
    }

    #[test]
    fn test_trailing_anchor_stripped_and_reapplied() {
        let pointcut = Pointcut::new("UserService save$").unwrap();
        assert!(pointcut.matches("UserService", "save"));
        assert!(!pointcut.matches("UserService", "save_all"));
    }

    #[test]
    fn test_alternation_matches_whole_key() {
        let pointcut = Pointcut::new("UserDao find|UserDao save").unwrap();
        assert!(pointcut.matches("UserDao", "find"));
        assert!(pointcut.matches("UserDao", "save"));
        // 非捕获组保证左侧分支同样受结束锚约束
        assert!(!pointcut.matches("UserDao", "find_all"));
    }

    #[test]
    fn test_multiple_trailing_anchors_stripped() {
        let pointcut = Pointcut::new("UserService save$$").unwrap();
        assert!(pointcut.matches("UserService", "save"));
        assert!(!pointcut.matches("UserService", "save_all"));
    }

    #[test]
    fn test_escaped_dollar_is_literal() {
        let pointcut = Pointcut::new(r"BillingService cost\$").unwrap();
        assert!(pointcut.matches("BillingService", "cost$"));
        assert!(!pointcut.matches("BillingService", "cost"));
    }

    #[test]
    fn test_escaped_backslash_then_anchor_still_stripped() {
        // `\\$` 是字面反斜杠加结束锚，不是转义的美元符号
        let pointcut = Pointcut::new(r"FileService path\\$").unwrap();
        assert!(pointcut.matches("FileService", r"path\"));
        assert!(!pointcut.matches("FileService", r"path\x"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(Pointcut::new("(").is_err());
    }
}
