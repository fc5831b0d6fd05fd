//! 通知链执行
//!
//! 织入后的方法在调用时进入这里，按固定阶段推进：
//! 前置 → 环绕 → 目标方法 → 环绕续延 → 返回/异常（二选一）→ 最终。
//! 任何阶段的 `Return` 立即终止链；目标方法的错误先以快照形式
//! 提供给后续通知，没有短路时在链尾重新抛出

use std::sync::Arc;

use crate::advice::{
    AdviceFlow, AfterFn, AfterReturningFn, AfterThrowingFn, AroundAfterFn, AroundFlow, AroundFn,
    BeforeFn,
};
use crate::error_info::ErrorInfo;
use crate::joint_point::{AnyValue, CallArgs, JointPoint, MethodFn};

/// 绑定到切面实例的一条通知
pub struct BoundAdvice<F> {
    /// 提供通知的切面 Bean 实例
    pub aspect: AnyValue,
    /// 通知回调
    pub handler: F,
    /// 同组内 order 越大越先执行
    pub order: i32,
}

/// 织入完成的方法：原始方法体加上五组已排序的通知
pub struct WovenMethod {
    pub target_type: &'static str,
    pub method_name: &'static str,
    pub params: &'static [&'static str],
    pub target: MethodFn,
    pub before: Vec<BoundAdvice<BeforeFn>>,
    pub around: Vec<BoundAdvice<AroundFn>>,
    pub after_returning: Vec<BoundAdvice<AfterReturningFn>>,
    pub after_throwing: Vec<BoundAdvice<AfterThrowingFn>>,
    pub after: Vec<BoundAdvice<AfterFn>>,
}

impl WovenMethod {
    /// 是否存在任何通知
    pub fn is_advised(&self) -> bool {
        !(self.before.is_empty()
            && self.around.is_empty()
            && self.after_returning.is_empty()
            && self.after_throwing.is_empty()
            && self.after.is_empty())
    }

    /// 执行完整的通知链
    pub async fn invoke(&self, instance: AnyValue, args: CallArgs) -> anyhow::Result<AnyValue> {
        let jp = JointPoint::new(
            self.target_type,
            self.method_name,
            self.params,
            instance,
            Arc::clone(&self.target),
            args,
        );
        tracing::trace!("Entering advice chain for {}", jp.signature());

        // 前置通知
        for advice in &self.before {
            match (advice.handler)(Arc::clone(&advice.aspect), jp.clone()).await? {
                AdviceFlow::Continue => {}
                AdviceFlow::Return(value) => {
                    tracing::debug!("Before advice short-circuited {}", jp.signature());
                    return Ok(value);
                }
            }
        }

        // 环绕通知，收集续延
        let mut continuations: Vec<AroundAfterFn> = Vec::new();
        for advice in &self.around {
            match (advice.handler)(Arc::clone(&advice.aspect), jp.clone()).await? {
                AroundFlow::Continue => {}
                AroundFlow::After(continuation) => continuations.push(continuation),
                AroundFlow::Return(value) => {
                    tracing::debug!("Around advice short-circuited {}", jp.signature());
                    return Ok(value);
                }
            }
        }

        // 目标方法：捕获结果或错误，此处不重新抛出
        let outcome = jp.proceed().await;
        let returning = outcome.as_ref().ok().map(Arc::clone);
        let exc_info = outcome
            .as_ref()
            .err()
            .map(|error| Arc::new(ErrorInfo::from_anyhow(error)));
        if let Some(exc) = &exc_info {
            tracing::debug!("Method {} raised: {}", jp.signature(), exc.message);
        }

        // 环绕续延，按收集顺序
        for continuation in &continuations {
            match continuation(jp.clone(), returning.clone(), exc_info.clone()).await? {
                AdviceFlow::Continue => {}
                AdviceFlow::Return(value) => return Ok(value),
            }
        }

        // 返回通知与异常通知互斥
        if let Some(exc) = &exc_info {
            for advice in &self.after_throwing {
                match (advice.handler)(Arc::clone(&advice.aspect), jp.clone(), Arc::clone(exc))
                    .await?
                {
                    AdviceFlow::Continue => {}
                    AdviceFlow::Return(value) => return Ok(value),
                }
            }
        } else {
            for advice in &self.after_returning {
                match (advice.handler)(Arc::clone(&advice.aspect), jp.clone(), returning.clone())
                    .await?
                {
                    AdviceFlow::Continue => {}
                    AdviceFlow::Return(value) => return Ok(value),
                }
            }
        }

        // 最终通知，无论成败都执行
        for advice in &self.after {
            match (advice.handler)(
                Arc::clone(&advice.aspect),
                jp.clone(),
                returning.clone(),
                exc_info.clone(),
            )
            .await?
            {
                AdviceFlow::Continue => {}
                AdviceFlow::Return(value) => return Ok(value),
            }
        }

        // 没有短路：原样返回结果或重新抛出捕获的错误
        outcome
    }
}
