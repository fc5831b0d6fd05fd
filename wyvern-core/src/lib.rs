//! Wyvern Core - 依赖注入容器
//!
//! 提供带 AOP 织入的依赖注入能力，支持：
//! - 单例与原型作用域
//! - 字面量与引用属性注入，容忍循环依赖
//! - 生命周期回调（post_construct / pre_destroy）
//! - 构造期方法织入与统一的异步调用入口

pub mod bean;
pub mod bean_factory;
pub mod error;
pub mod logging;
pub mod property;
pub mod scope;
pub mod utils;
mod weaver;

// 重新导出核心类型
pub use bean::{
    AdviceDecl, BeanDefinition, LifecycleFn, LiteralProperty, MethodDescriptor, WiredProperty,
};
pub use bean_factory::BeanFactory;
pub use error::{ContainerError, ContainerResult};
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use property::PropertyValue;
pub use scope::Scope;

// 重新导出 AOP 支持
pub use wyvern_aop as aop;

/// 预导入模块
pub mod prelude {
    pub use crate::bean::{BeanDefinition, MethodDescriptor};
    pub use crate::bean_factory::BeanFactory;
    pub use crate::error::{ContainerError, ContainerResult};
    pub use crate::logging::{LogFormat, LogLevel, LoggingConfig};
    pub use crate::property::PropertyValue;
    pub use crate::scope::Scope;
    pub use wyvern_aop::{
        around_after, return_value, AdviceFlow, AdviceHandler, AdviceKind, AnyValue, AroundFlow,
        CallArgs, ErrorInfo, JointPoint,
    };
}
