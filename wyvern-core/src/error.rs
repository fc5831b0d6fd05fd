//! 容器错误类型

use thiserror::Error;

/// 容器统一错误
#[derive(Debug, Error)]
pub enum ContainerError {
    /// 注册期发现重复的 Bean 名称
    #[error("Duplicated bean name '{0}'")]
    DuplicatedBeanName(String),

    /// 按名称找不到 Bean 定义
    #[error("Bean '{0}' not found")]
    BeanNotFound(String),

    /// 组件声明不满足约束
    #[error("Unavailable bean class: {0}")]
    UnavailableBeanClass(String),

    /// 切点模式编译失败
    #[error("Invalid pointcut pattern '{pattern}'")]
    InvalidPointcut {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// 织入失败
    #[error("Weaving failed for '{target}': {reason}")]
    WeavingFailed { target: String, reason: String },

    /// Bean 创建（注入或初始化）失败
    #[error("Failed to create bean '{name}'")]
    BeanCreationFailed {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// Bean 上不存在指定方法
    #[error("Method '{method}' not found on bean '{bean}'")]
    MethodNotFound { bean: String, method: String },

    /// 其他错误
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 容器操作的统一结果类型
pub type ContainerResult<T> = Result<T, ContainerError>;
