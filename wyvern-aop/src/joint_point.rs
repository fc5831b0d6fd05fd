//! 连接点（JointPoint）定义
//!
//! 连接点描述一次方法调用的完整上下文：目标类型、方法、接收者实例
//! 与调用参数，供通知链在执行期间观察与重放

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

/// 容器中流动的动态值
pub type AnyValue = Arc<dyn Any + Send + Sync>;

/// 方法体类型
///
/// 接收 Bean 实例与调用参数，返回异步结果；下转型失败或业务失败
/// 都通过 `Err` 表达
pub type MethodFn =
    Arc<dyn Fn(AnyValue, CallArgs) -> BoxFuture<'static, anyhow::Result<AnyValue>> + Send + Sync>;

/// 一次调用的实参
#[derive(Clone, Default)]
pub struct CallArgs {
    /// 位置参数
    pub positional: Vec<AnyValue>,
    /// 关键字参数
    pub keyword: HashMap<String, AnyValue>,
}

impl CallArgs {
    /// 创建空参数列表
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个位置参数
    pub fn arg<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.positional.push(Arc::new(value));
        self
    }

    /// 追加一个关键字参数
    pub fn kwarg<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.keyword.insert(name.into(), Arc::new(value));
        self
    }

    /// 按索引取位置参数并下转型
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> Option<&T> {
        self.positional.get(index)?.downcast_ref::<T>()
    }

    /// 按名称取关键字参数并下转型
    pub fn get_kw<T: Any + Send + Sync>(&self, name: &str) -> Option<&T> {
        self.keyword.get(name)?.downcast_ref::<T>()
    }

    /// 是否没有任何参数
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

impl fmt::Debug for CallArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallArgs")
            .field("positional", &self.positional.len())
            .field("keyword", &self.keyword.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// 连接点：一次方法调用的上下文
///
/// 由链执行器为每次调用创建；克隆共享接收者与参数。
/// `proceed` 可以被等待任意多次，每次都以捕获的参数重新调用目标方法
#[derive(Clone)]
pub struct JointPoint {
    target_type: &'static str,
    method_name: &'static str,
    params: &'static [&'static str],
    instance: AnyValue,
    method: MethodFn,
    args: CallArgs,
}

impl JointPoint {
    /// 创建连接点
    pub fn new(
        target_type: &'static str,
        method_name: &'static str,
        params: &'static [&'static str],
        instance: AnyValue,
        method: MethodFn,
        args: CallArgs,
    ) -> Self {
        Self {
            target_type,
            method_name,
            params,
            instance,
            method,
            args,
        }
    }

    /// 以捕获的参数调用目标方法
    pub async fn proceed(&self) -> anyhow::Result<AnyValue> {
        (self.method)(Arc::clone(&self.instance), self.args.clone()).await
    }

    /// 完整的方法签名
    pub fn signature(&self) -> String {
        format!("{}::{}", self.target_type, self.method_name)
    }

    /// 目标类型名
    pub fn target_type(&self) -> &'static str {
        self.target_type
    }

    /// 目标方法名
    pub fn method_name(&self) -> &'static str {
        self.method_name
    }

    /// 目标方法的形参名
    pub fn param_names(&self) -> &'static [&'static str] {
        self.params
    }

    /// 接收者实例
    pub fn instance(&self) -> &AnyValue {
        &self.instance
    }

    /// 调用参数
    pub fn args(&self) -> &CallArgs {
        &self.args
    }
}

impl fmt::Debug for JointPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JointPoint")
            .field("target_type", &self.target_type)
            .field("method_name", &self.method_name)
            .field("args", &self.args)
            .finish()
    }
}

impl fmt::Display for JointPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_args_builder() {
        let args = CallArgs::new().arg(42i64).kwarg("name", "wyvern".to_string());
        assert_eq!(args.get::<i64>(0), Some(&42));
        assert_eq!(args.get_kw::<String>("name"), Some(&"wyvern".to_string()));
        assert!(args.get::<i64>(1).is_none());
        assert!(!args.is_empty());
    }

    #[test]
    fn test_signature_format() {
        let method: MethodFn = Arc::new(|_, _| Box::pin(async { Ok(Arc::new(()) as AnyValue) }));
        let jp = JointPoint::new(
            "UserService",
            "get_user",
            &["id"],
            Arc::new(()),
            method,
            CallArgs::new(),
        );
        assert_eq!(jp.signature(), "UserService::get_user");
        assert_eq!(jp.param_names(), &["id"]);
    }
}
