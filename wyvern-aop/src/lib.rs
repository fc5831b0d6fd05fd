//! Wyvern AOP - 面向切面编程支持
//!
//! 提供方法级拦截能力，支持：
//! - 五种通知类型（Before、Around、AfterReturning、AfterThrowing、After）
//! - 针对 `"<TypeName> <methodName>"` 规范键的正则切点
//! - 显式短路信号（`AdviceFlow::Return`）替代控制流异常
//! - 异步通知链执行器，保留原始错误用于重新抛出

pub mod advice;
pub mod chain;
pub mod error_info;
pub mod joint_point;
pub mod pointcut;
pub mod registry;

// 重新导出核心类型
pub use advice::{
    around_after, return_value, AdviceFlow, AdviceHandler, AdviceKind, AdviceResult, AfterFn,
    AfterReturningFn, AfterThrowingFn, AroundAfterFn, AroundFlow, AroundFn, BeforeFn,
};
pub use chain::{BoundAdvice, WovenMethod};
pub use error_info::ErrorInfo;
pub use joint_point::{AnyValue, CallArgs, JointPoint, MethodFn};
pub use pointcut::{advice_key, Pointcut};
pub use registry::{AdviceBinding, AdviceRegistry};

/// 预导入模块
pub mod prelude {
    pub use crate::advice::{
        around_after, return_value, AdviceFlow, AdviceHandler, AdviceKind, AdviceResult,
        AroundFlow,
    };
    pub use crate::chain::{BoundAdvice, WovenMethod};
    pub use crate::error_info::ErrorInfo;
    pub use crate::joint_point::{AnyValue, CallArgs, JointPoint, MethodFn};
    pub use crate::pointcut::{advice_key, Pointcut};
    pub use crate::registry::{AdviceBinding, AdviceRegistry};
}
