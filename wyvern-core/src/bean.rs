//! Bean 描述符模型
//!
//! 描述一个受管组件的全部元数据：名称、作用域、属性注入、生命周期回调、
//! 受管方法与切面通知声明。描述符在注册前通过构建器组装，进入容器后不再变更。
//!
//! 实例以 `Arc<dyn Any + Send + Sync>` 形式流动，注入器闭包负责把接收者
//! 下转型回具体类型；组件通过内部可变性（`RwLock`、`OnceLock` 等）持有注入状态

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use wyvern_aop::{AdviceHandler, AnyValue, CallArgs, MethodFn};

use crate::property::PropertyValue;
use crate::scope::Scope;
use crate::utils::naming::to_pascal_case;

/// 生命周期回调
pub type LifecycleFn = Arc<dyn Fn(&(dyn Any + Send + Sync)) -> anyhow::Result<()> + Send + Sync>;

/// 字面量属性注入器
pub type LiteralInjectFn =
    Arc<dyn Fn(&(dyn Any + Send + Sync), &PropertyValue) -> anyhow::Result<()> + Send + Sync>;

/// 引用属性注入器
pub type WiredInjectFn =
    Arc<dyn Fn(&(dyn Any + Send + Sync), AnyValue) -> anyhow::Result<()> + Send + Sync>;

/// 实例构造函数
pub type ConstructorFn = Arc<dyn Fn() -> AnyValue + Send + Sync>;

/// 一个受管方法
#[derive(Clone)]
pub struct MethodDescriptor {
    /// 方法名，在所属定义内唯一
    pub name: &'static str,
    /// 形参名，供连接点做签名内省
    pub params: &'static [&'static str],
    /// 方法体
    pub handler: MethodFn,
}

impl MethodDescriptor {
    /// 以具体接收者类型构造方法描述符
    pub fn new<T, F, Fut>(name: &'static str, params: &'static [&'static str], f: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(Arc<T>, CallArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<AnyValue>> + Send + 'static,
    {
        let f = Arc::new(f);
        let handler: MethodFn = Arc::new(move |instance: AnyValue, args: CallArgs| {
            let f = Arc::clone(&f);
            Box::pin(async move {
                let receiver = instance.downcast::<T>().map_err(|_| {
                    anyhow::anyhow!(
                        "Method '{}' expects receiver of type {}",
                        name,
                        std::any::type_name::<T>()
                    )
                })?;
                f(receiver, args).await
            })
        });
        Self {
            name,
            params,
            handler,
        }
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

/// 字面量属性声明，先于引用属性注入
pub struct LiteralProperty {
    /// 字段名
    pub field: String,
    /// 注入的值
    pub value: PropertyValue,
    /// 注入器
    pub inject: LiteralInjectFn,
}

/// 引用属性声明，按目标 Bean 名称装配
pub struct WiredProperty {
    /// 字段名
    pub field: String,
    /// 目标 Bean 名称
    pub target: String,
    /// 注入器
    pub inject: WiredInjectFn,
}

/// 切面通知声明
pub struct AdviceDecl {
    /// 切点模式
    pub pattern: String,
    /// 通知方法名，在所属切面内唯一
    pub method: String,
    /// 通知回调
    pub handler: AdviceHandler,
}

/// Bean 定义
///
/// 通过 `with_*` 构建器链组装，交给容器后冻结
pub struct BeanDefinition {
    /// 容器内唯一的 Bean 名称，默认为类型短名
    pub name: String,
    /// 类型短名，用于切点匹配
    pub type_name: &'static str,
    /// 作用域
    pub scope: Scope,
    pub(crate) constructor: ConstructorFn,
    /// 字面量属性，按声明顺序注入
    pub literal_properties: Vec<LiteralProperty>,
    /// 引用属性，在字面量之后按声明顺序注入
    pub wired_properties: Vec<WiredProperty>,
    pub(crate) post_construct: Option<LifecycleFn>,
    pub(crate) pre_destroy: Option<LifecycleFn>,
    /// 受管方法
    pub methods: Vec<MethodDescriptor>,
    /// 切面顺序；声明了通知但缺少该标记的定义无法通过校验
    pub aspect_order: Option<i32>,
    /// 通知声明
    pub advices: Vec<AdviceDecl>,
}

impl BeanDefinition {
    /// 创建 Bean 定义，名称取类型短名
    pub fn new<T, F>(constructor: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::named(short_type_name::<T>(), constructor)
    }

    /// 以显式名称创建 Bean 定义
    pub fn named<T, F, N>(name: N, constructor: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
        N: Into<String>,
    {
        Self {
            name: name.into(),
            type_name: short_type_name::<T>(),
            scope: Scope::default(),
            constructor: Arc::new(move || Arc::new(constructor()) as AnyValue),
            literal_properties: Vec::new(),
            wired_properties: Vec::new(),
            post_construct: None,
            pre_destroy: None,
            methods: Vec::new(),
            aspect_order: None,
            advices: Vec::new(),
        }
    }

    /// 设置作用域
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// 声明一个字面量属性
    pub fn with_value<T, N, V, F>(mut self, field: N, value: V, setter: F) -> Self
    where
        T: Any + Send + Sync,
        N: Into<String>,
        V: Into<PropertyValue>,
        F: Fn(&T, &PropertyValue) + Send + Sync + 'static,
    {
        let field = field.into();
        let described = field.clone();
        let inject: LiteralInjectFn = Arc::new(move |instance, value| {
            let receiver = instance.downcast_ref::<T>().ok_or_else(|| {
                anyhow::anyhow!(
                    "Literal property '{}' expects receiver of type {}",
                    described,
                    std::any::type_name::<T>()
                )
            })?;
            setter(receiver, value);
            Ok(())
        });
        self.literal_properties.push(LiteralProperty {
            field,
            value: value.into(),
            inject,
        });
        self
    }

    /// 声明一个引用属性，指向命名的目标 Bean
    pub fn with_wired<T, D, N, M, F>(mut self, field: N, target: M, setter: F) -> Self
    where
        T: Any + Send + Sync,
        D: Any + Send + Sync,
        N: Into<String>,
        M: Into<String>,
        F: Fn(&T, Arc<D>) + Send + Sync + 'static,
    {
        let field = field.into();
        let target = target.into();
        let described = field.clone();
        let inject: WiredInjectFn = Arc::new(move |instance, dependency| {
            let receiver = instance.downcast_ref::<T>().ok_or_else(|| {
                anyhow::anyhow!(
                    "Wired property '{}' expects receiver of type {}",
                    described,
                    std::any::type_name::<T>()
                )
            })?;
            let dependency = dependency.downcast::<D>().map_err(|_| {
                anyhow::anyhow!(
                    "Wired property '{}' expects dependency of type {}",
                    described,
                    std::any::type_name::<D>()
                )
            })?;
            setter(receiver, dependency);
            Ok(())
        });
        self.wired_properties.push(WiredProperty {
            field,
            target,
            inject,
        });
        self
    }

    /// 声明一个自动装配属性，目标名由字段名推导（`user_dao` → `UserDao`）
    pub fn with_autowired<T, D, N, F>(self, field: N, setter: F) -> Self
    where
        T: Any + Send + Sync,
        D: Any + Send + Sync,
        N: Into<String>,
        F: Fn(&T, Arc<D>) + Send + Sync + 'static,
    {
        let field = field.into();
        let target = to_pascal_case(&field);
        self.with_wired(field, target, setter)
    }

    /// 设置初始化回调，在属性注入完成后调用
    pub fn with_post_construct<T, F>(mut self, hook: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.post_construct = Some(wrap_lifecycle(hook));
        self
    }

    /// 设置销毁回调，在容器关闭时调用
    pub fn with_pre_destroy<T, F>(mut self, hook: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.pre_destroy = Some(wrap_lifecycle(hook));
        self
    }

    /// 声明一个受管方法
    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// 标记为切面并指定顺序，order 越大越先执行
    pub fn with_aspect_order(mut self, order: i32) -> Self {
        self.aspect_order = Some(order);
        self
    }

    /// 声明一条通知
    pub fn with_advice<P, M>(mut self, pattern: P, method: M, handler: AdviceHandler) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        self.advices.push(AdviceDecl {
            pattern: pattern.into(),
            method: method.into(),
            handler,
        });
        self
    }

    /// 构造一个未注入的原始实例
    pub(crate) fn construct(&self) -> AnyValue {
        (self.constructor)()
    }

    /// 按名称查找受管方法
    pub(crate) fn find_method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// 按名称查找通知声明
    pub(crate) fn find_advice(&self, name: &str) -> Option<&AdviceDecl> {
        self.advices.iter().find(|advice| advice.method == name)
    }
}

impl fmt::Debug for BeanDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDefinition")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("scope", &self.scope)
            .field("literal_properties", &self.literal_properties.len())
            .field("wired_properties", &self.wired_properties.len())
            .field("methods", &self.methods.len())
            .field("aspect_order", &self.aspect_order)
            .field("advices", &self.advices.len())
            .finish()
    }
}

fn wrap_lifecycle<T, F>(hook: F) -> LifecycleFn
where
    T: Any + Send + Sync,
    F: Fn(&T) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(move |instance| {
        let receiver = instance.downcast_ref::<T>().ok_or_else(|| {
            anyhow::anyhow!(
                "Lifecycle hook expects receiver of type {}",
                std::any::type_name::<T>()
            )
        })?;
        hook(receiver)
    })
}

/// 类型短名：去掉模块路径与泛型实参的类型名
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct SampleDao;

    #[test]
    fn test_name_defaults_to_short_type_name() {
        let definition = BeanDefinition::new(SampleDao::default);
        assert_eq!(definition.name, "SampleDao");
        assert_eq!(definition.type_name, "SampleDao");
        assert_eq!(definition.scope, Scope::Singleton);
    }

    #[test]
    fn test_generic_type_name_drops_type_arguments() {
        struct Wrapper<T>(std::marker::PhantomData<T>);

        let definition = BeanDefinition::new(|| Wrapper::<SampleDao>(std::marker::PhantomData));
        assert_eq!(definition.name, "Wrapper");
        assert_eq!(definition.type_name, "Wrapper");
    }

    #[test]
    fn test_autowired_target_derivation() {
        let definition = BeanDefinition::new(SampleDao::default)
            .with_autowired("sample_dao", |_receiver: &SampleDao, _dep: Arc<SampleDao>| {});
        assert_eq!(definition.wired_properties[0].target, "SampleDao");
        assert_eq!(definition.wired_properties[0].field, "sample_dao");
    }

    #[test]
    fn test_builder_accumulates_declarations() {
        let definition = BeanDefinition::named("CustomName", SampleDao::default)
            .with_scope(Scope::Prototype)
            .with_value("retries", 3i64, |_receiver: &SampleDao, _value: &PropertyValue| {})
            .with_method(MethodDescriptor::new(
                "ping",
                &[],
                |_receiver: Arc<SampleDao>, _args| async { Ok(Arc::new(()) as AnyValue) },
            ));

        assert_eq!(definition.name, "CustomName");
        assert_eq!(definition.scope, Scope::Prototype);
        assert_eq!(definition.literal_properties.len(), 1);
        assert!(definition.find_method("ping").is_some());
        assert!(definition.find_method("pong").is_none());
    }
}
