//! 错误信息结构
//!
//! 目标方法抛出的错误以可克隆的快照形式传给 after_throwing / after 通知，
//! 原始错误由链执行器保留用于最终重新抛出

use std::fmt;

/// 异常状态快照
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// 错误消息
    pub message: String,
    /// 错误源链（由外向内）
    pub source_chain: Vec<String>,
}

impl ErrorInfo {
    /// 从 anyhow 错误构建快照
    pub fn from_anyhow(error: &anyhow::Error) -> Self {
        let message = error.to_string();
        let source_chain = error.chain().skip(1).map(|source| source.to_string()).collect();
        Self {
            message,
            source_chain,
        }
    }

    /// 完整的错误描述，包含源链
    pub fn full_description(&self) -> String {
        if self.source_chain.is_empty() {
            self.message.clone()
        } else {
            format!(
                "{}\nCaused by:\n  {}",
                self.message,
                self.source_chain.join("\n  ")
            )
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_anyhow_captures_chain() {
        let root = anyhow::anyhow!("connection refused");
        let error = root.context("failed to load user");
        let info = ErrorInfo::from_anyhow(&error);

        assert_eq!(info.message, "failed to load user");
        assert_eq!(info.source_chain, vec!["connection refused".to_string()]);
        assert!(info.full_description().contains("Caused by"));
    }

    #[test]
    fn test_plain_error_has_empty_chain() {
        let error = anyhow::anyhow!("boom");
        let info = ErrorInfo::from_anyhow(&error);

        assert_eq!(info.message, "boom");
        assert!(info.source_chain.is_empty());
        assert_eq!(info.full_description(), "boom");
    }
}
