//! 通知（Advice）定义
//!
//! 定义五种通知类型、显式的短路信号以及各类通知的回调形态。
//! 通知通过返回 `AdviceFlow::Return` 终止整条链；通知自身的失败
//! 通过 `Err` 表达，与短路语义无关

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error_info::ErrorInfo;
use crate::joint_point::{AnyValue, JointPoint};

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdviceKind {
    /// 前置通知：目标方法执行前
    Before,
    /// 环绕通知：目标方法执行前，可注册执行后的续延
    Around,
    /// 返回通知：目标方法成功返回后
    AfterReturning,
    /// 异常通知：目标方法抛出错误后
    AfterThrowing,
    /// 最终通知：无论成败都执行
    After,
}

impl fmt::Display for AdviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdviceKind::Before => "before",
            AdviceKind::Around => "around",
            AdviceKind::AfterReturning => "after_returning",
            AdviceKind::AfterThrowing => "after_throwing",
            AdviceKind::After => "after",
        };
        f.write_str(name)
    }
}

/// 通知的执行结果
///
/// `Return` 立即终止通知链，携带的值成为整次调用的结果
pub enum AdviceFlow {
    /// 继续执行链上的下一步
    Continue,
    /// 短路：以该值作为调用结果返回
    Return(AnyValue),
}

impl fmt::Debug for AdviceFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdviceFlow::Continue => f.write_str("Continue"),
            AdviceFlow::Return(_) => f.write_str("Return(..)"),
        }
    }
}

/// 构造短路信号，携带给调用方的返回值
pub fn return_value<T: Any + Send + Sync>(value: T) -> AdviceFlow {
    AdviceFlow::Return(Arc::new(value))
}

/// 环绕通知的执行结果
pub enum AroundFlow {
    /// 继续执行，不注册续延
    Continue,
    /// 注册一个续延，在目标方法执行后按收集顺序调用
    After(AroundAfterFn),
    /// 短路：以该值作为调用结果返回
    Return(AnyValue),
}

impl fmt::Debug for AroundFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AroundFlow::Continue => f.write_str("Continue"),
            AroundFlow::After(_) => f.write_str("After(..)"),
            AroundFlow::Return(_) => f.write_str("Return(..)"),
        }
    }
}

/// 通知的通用返回类型
pub type AdviceResult = anyhow::Result<AdviceFlow>;

/// 前置通知回调：(切面实例, 连接点)
pub type BeforeFn =
    Arc<dyn Fn(AnyValue, JointPoint) -> BoxFuture<'static, AdviceResult> + Send + Sync>;

/// 环绕通知回调：(切面实例, 连接点)
pub type AroundFn =
    Arc<dyn Fn(AnyValue, JointPoint) -> BoxFuture<'static, anyhow::Result<AroundFlow>> + Send + Sync>;

/// 返回通知回调：(切面实例, 连接点, 返回值)
pub type AfterReturningFn = Arc<
    dyn Fn(AnyValue, JointPoint, Option<AnyValue>) -> BoxFuture<'static, AdviceResult>
        + Send
        + Sync,
>;

/// 异常通知回调：(切面实例, 连接点, 异常快照)
pub type AfterThrowingFn = Arc<
    dyn Fn(AnyValue, JointPoint, Arc<ErrorInfo>) -> BoxFuture<'static, AdviceResult> + Send + Sync,
>;

/// 最终通知回调：(切面实例, 连接点, 返回值, 异常快照)
pub type AfterFn = Arc<
    dyn Fn(
            AnyValue,
            JointPoint,
            Option<AnyValue>,
            Option<Arc<ErrorInfo>>,
        ) -> BoxFuture<'static, AdviceResult>
        + Send
        + Sync,
>;

/// 环绕续延回调：(连接点, 返回值, 异常快照)
pub type AroundAfterFn = Arc<
    dyn Fn(JointPoint, Option<AnyValue>, Option<Arc<ErrorInfo>>) -> BoxFuture<'static, AdviceResult>
        + Send
        + Sync,
>;

/// 按类型标记的通知回调
pub enum AdviceHandler {
    Before(BeforeFn),
    Around(AroundFn),
    AfterReturning(AfterReturningFn),
    AfterThrowing(AfterThrowingFn),
    After(AfterFn),
}

impl AdviceHandler {
    /// 通知类型标记
    pub fn kind(&self) -> AdviceKind {
        match self {
            AdviceHandler::Before(_) => AdviceKind::Before,
            AdviceHandler::Around(_) => AdviceKind::Around,
            AdviceHandler::AfterReturning(_) => AdviceKind::AfterReturning,
            AdviceHandler::AfterThrowing(_) => AdviceKind::AfterThrowing,
            AdviceHandler::After(_) => AdviceKind::After,
        }
    }

    /// 由异步闭包构造前置通知
    pub fn before<F, Fut>(f: F) -> Self
    where
        F: Fn(AnyValue, JointPoint) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AdviceResult> + Send + 'static,
    {
        let handler: BeforeFn = Arc::new(move |aspect, jp| Box::pin(f(aspect, jp)));
        AdviceHandler::Before(handler)
    }

    /// 由异步闭包构造环绕通知
    pub fn around<F, Fut>(f: F) -> Self
    where
        F: Fn(AnyValue, JointPoint) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<AroundFlow>> + Send + 'static,
    {
        let handler: AroundFn = Arc::new(move |aspect, jp| Box::pin(f(aspect, jp)));
        AdviceHandler::Around(handler)
    }

    /// 由异步闭包构造返回通知
    pub fn after_returning<F, Fut>(f: F) -> Self
    where
        F: Fn(AnyValue, JointPoint, Option<AnyValue>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AdviceResult> + Send + 'static,
    {
        let handler: AfterReturningFn =
            Arc::new(move |aspect, jp, returning| Box::pin(f(aspect, jp, returning)));
        AdviceHandler::AfterReturning(handler)
    }

    /// 由异步闭包构造异常通知
    pub fn after_throwing<F, Fut>(f: F) -> Self
    where
        F: Fn(AnyValue, JointPoint, Arc<ErrorInfo>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AdviceResult> + Send + 'static,
    {
        let handler: AfterThrowingFn =
            Arc::new(move |aspect, jp, exc| Box::pin(f(aspect, jp, exc)));
        AdviceHandler::AfterThrowing(handler)
    }

    /// 由异步闭包构造最终通知
    pub fn after<F, Fut>(f: F) -> Self
    where
        F: Fn(AnyValue, JointPoint, Option<AnyValue>, Option<Arc<ErrorInfo>>) -> Fut
            + Send
            + Sync
            + 'static,
        Fut: Future<Output = AdviceResult> + Send + 'static,
    {
        let handler: AfterFn = Arc::new(move |aspect, jp, returning, exc| {
            Box::pin(f(aspect, jp, returning, exc))
        });
        AdviceHandler::After(handler)
    }
}

impl fmt::Debug for AdviceHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AdviceHandler({})", self.kind())
    }
}

/// 由异步闭包构造环绕续延
pub fn around_after<F, Fut>(f: F) -> AroundAfterFn
where
    F: Fn(JointPoint, Option<AnyValue>, Option<Arc<ErrorInfo>>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AdviceResult> + Send + 'static,
{
    Arc::new(move |jp, returning, exc| Box::pin(f(jp, returning, exc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_kind_tags() {
        let before = AdviceHandler::before(|_, _| async { Ok(AdviceFlow::Continue) });
        assert_eq!(before.kind(), AdviceKind::Before);

        let around = AdviceHandler::around(|_, _| async { Ok(AroundFlow::Continue) });
        assert_eq!(around.kind(), AdviceKind::Around);

        let after = AdviceHandler::after(|_, _, _, _| async { Ok(AdviceFlow::Continue) });
        assert_eq!(after.kind(), AdviceKind::After);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(AdviceKind::AfterReturning.to_string(), "after_returning");
        assert_eq!(AdviceKind::AfterThrowing.to_string(), "after_throwing");
    }
}
