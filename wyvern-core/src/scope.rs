//! Bean 作用域定义

use std::fmt;

/// Bean 的作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// 单例：整个容器只创建一个实例，缓存至容器关闭
    Singleton,
    /// 原型：每次顶层请求都创建新实例
    Prototype,
}

impl Default for Scope {
    fn default() -> Self {
        Scope::Singleton
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Singleton => write!(f, "singleton"),
            Scope::Prototype => write!(f, "prototype"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_singleton() {
        assert_eq!(Scope::default(), Scope::Singleton);
    }

    #[test]
    fn test_display() {
        assert_eq!(Scope::Singleton.to_string(), "singleton");
        assert_eq!(Scope::Prototype.to_string(), "prototype");
    }
}
