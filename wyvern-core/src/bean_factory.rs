//! Bean 工厂 - 依赖注入容器
//!
//! 持有全部 Bean 定义与通知索引，按需创建实例并完成递归装配。
//! 定义表、通知索引与织入表在构造完成后只读；单例创建经过容器级
//! 可重入锁（解析过程会在持锁状态下递归），缓存命中路径无锁竞争

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};

use wyvern_aop::{AdviceBinding, AdviceRegistry, AnyValue, CallArgs, Pointcut, WovenMethod};

use crate::bean::BeanDefinition;
use crate::error::{ContainerError, ContainerResult};
use crate::scope::Scope;
use crate::weaver;

/// 依赖注入容器
pub struct BeanFactory {
    /// Bean 定义表，构造后只读
    definitions: HashMap<String, Arc<BeanDefinition>>,
    /// 单例缓存：只增不删，容器关闭时统一清空
    singletons: RwLock<HashMap<String, AnyValue>>,
    /// 容器级创建锁
    creation_lock: ReentrantMutex<()>,
    /// 通知索引，构造后只读
    advice_registry: AdviceRegistry,
    /// 织入表：(类型名, 方法名) → 织入后的方法
    woven: HashMap<(&'static str, &'static str), Arc<WovenMethod>>,
    /// 容器是否已关闭
    closed: AtomicBool,
}

/// 单次顶层解析请求携带的状态
///
/// `creating` 保存已构造但尚未完成装配的实例，循环依赖通过直接绑定
/// 在建实例打破；`created` 让同一张依赖图内的非单例共享实例
#[derive(Default)]
struct ResolutionScope {
    creating: HashMap<String, AnyValue>,
    created: HashMap<String, AnyValue>,
}

impl BeanFactory {
    /// 从一组 Bean 定义构建容器
    ///
    /// 注册期错误（名称重复、切面声明不合法、切点编译失败、织入失败）
    /// 直接使构造失败，不会暴露部分初始化的容器
    pub fn new(definitions: Vec<BeanDefinition>) -> ContainerResult<Self> {
        let mut table: HashMap<String, Arc<BeanDefinition>> =
            HashMap::with_capacity(definitions.len());
        for definition in definitions {
            tracing::debug!(
                "Registering bean definition '{}' ({})",
                definition.name,
                definition.type_name
            );
            validate_definition(&definition)?;
            if table.contains_key(&definition.name) {
                return Err(ContainerError::DuplicatedBeanName(definition.name));
            }
            table.insert(definition.name.clone(), Arc::new(definition));
        }

        let advice_registry = build_advice_registry(&table)?;

        let mut factory = Self {
            definitions: table,
            singletons: RwLock::new(HashMap::new()),
            creation_lock: ReentrantMutex::new(()),
            advice_registry,
            woven: HashMap::new(),
            closed: AtomicBool::new(false),
        };
        factory.woven = weaver::weave(&factory)?;

        tracing::info!(
            "Container initialized with {} bean definition(s), {} woven method(s)",
            factory.definitions.len(),
            factory.woven.len()
        );
        Ok(factory)
    }

    /// 按名称获取 Bean 实例
    ///
    /// 单例返回缓存实例；原型每次顶层调用返回新实例，
    /// 同一次调用解析出的依赖图内部保持一致
    pub fn get(&self, name: &str) -> ContainerResult<AnyValue> {
        let mut scope = ResolutionScope::default();
        self.get_inner(name, &mut scope)
    }

    fn get_inner(&self, name: &str, scope: &mut ResolutionScope) -> ContainerResult<AnyValue> {
        // 单例快路径：缓存填充后不经过创建锁
        if let Some(instance) = self.singletons.read().get(name) {
            return Ok(Arc::clone(instance));
        }

        let definition = self
            .definitions
            .get(name)
            .ok_or_else(|| ContainerError::BeanNotFound(name.to_string()))?;

        match definition.scope {
            Scope::Singleton => {
                let _guard = self.creation_lock.lock();
                // 双重检查：竞争线程可能已完成创建
                if let Some(instance) = self.singletons.read().get(name) {
                    return Ok(Arc::clone(instance));
                }
                tracing::debug!("Creating shared instance of singleton bean '{}'", name);
                let instance = definition.construct();
                self.populate(&instance, definition, scope)?;
                self.singletons
                    .write()
                    .insert(name.to_string(), Arc::clone(&instance));
                self.run_post_construct(definition, &instance)?;
                Ok(instance)
            }
            Scope::Prototype => {
                tracing::debug!("Creating new instance of prototype bean '{}'", name);
                let instance = definition.construct();
                self.populate(&instance, definition, scope)?;
                self.run_post_construct(definition, &instance)?;
                Ok(instance)
            }
        }
    }

    /// 注入属性：字面量在前，引用在后，均按声明顺序
    fn populate(
        &self,
        instance: &AnyValue,
        definition: &BeanDefinition,
        scope: &mut ResolutionScope,
    ) -> ContainerResult<()> {
        scope
            .creating
            .insert(definition.name.clone(), Arc::clone(instance));

        for literal in &definition.literal_properties {
            tracing::trace!(
                "Injecting literal property '{}' into bean '{}'",
                literal.field,
                definition.name
            );
            (literal.inject)(instance.as_ref(), &literal.value).map_err(|source| {
                ContainerError::BeanCreationFailed {
                    name: definition.name.clone(),
                    source,
                }
            })?;
        }

        for wired in &definition.wired_properties {
            // 目标仍在创建中时直接绑定未完成的实例，打破循环
            let in_flight = scope
                .creating
                .get(&wired.target)
                .cloned()
                .or_else(|| scope.created.get(&wired.target).cloned());
            let dependency = match in_flight {
                Some(existing) => existing,
                None => self.get_inner(&wired.target, scope)?,
            };
            tracing::trace!(
                "Wiring property '{}' of bean '{}' to bean '{}'",
                wired.field,
                definition.name,
                wired.target
            );
            (wired.inject)(instance.as_ref(), dependency).map_err(|source| {
                ContainerError::BeanCreationFailed {
                    name: definition.name.clone(),
                    source,
                }
            })?;
        }

        scope.creating.remove(&definition.name);
        scope
            .created
            .insert(definition.name.clone(), Arc::clone(instance));
        Ok(())
    }

    fn run_post_construct(
        &self,
        definition: &BeanDefinition,
        instance: &AnyValue,
    ) -> ContainerResult<()> {
        if let Some(hook) = &definition.post_construct {
            tracing::trace!("Invoking post_construct for bean '{}'", definition.name);
            hook(instance.as_ref()).map_err(|source| ContainerError::BeanCreationFailed {
                name: definition.name.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// 方法调用的统一入口
    ///
    /// 解析 Bean、查找方法描述符；目标方法若在构造期被织入则经由
    /// 通知链执行，否则直接调用原始方法体
    pub async fn invoke(
        &self,
        bean_name: &str,
        method_name: &str,
        args: CallArgs,
    ) -> anyhow::Result<AnyValue> {
        let definition = self
            .definitions
            .get(bean_name)
            .ok_or_else(|| ContainerError::BeanNotFound(bean_name.to_string()))?;
        let method = definition.find_method(method_name).ok_or_else(|| {
            ContainerError::MethodNotFound {
                bean: bean_name.to_string(),
                method: method_name.to_string(),
            }
        })?;
        let instance = self.get(bean_name)?;

        match self.woven.get(&(definition.type_name, method.name)) {
            Some(woven) => woven.invoke(instance, args).await,
            None => (method.handler)(instance, args).await,
        }
    }

    /// 遍历全部 (名称, 定义)，顺序任意，可重复开始
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BeanDefinition)> {
        self.definitions
            .iter()
            .map(|(name, definition)| (name.as_str(), definition.as_ref()))
    }

    /// 按名称查看 Bean 定义
    pub fn definition(&self, name: &str) -> Option<&BeanDefinition> {
        self.definitions.get(name).map(|definition| definition.as_ref())
    }

    /// 是否存在指定名称的 Bean 定义
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Bean 定义数量
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// 是否没有任何定义
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// 关闭容器，对每个已创建的单例调用 pre_destroy
    ///
    /// 幂等：重复调用不再触发回调。单个回调失败只记录日志，
    /// 不影响其余实例的销毁
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            tracing::debug!("Container already closed, skipping destruction");
            return;
        }
        tracing::info!("Closing container, destroying singleton beans");
        let instances: Vec<(String, AnyValue)> = self.singletons.write().drain().collect();
        for (name, instance) in instances {
            let Some(definition) = self.definitions.get(&name) else {
                continue;
            };
            if let Some(hook) = &definition.pre_destroy {
                tracing::debug!("Invoking pre_destroy for bean '{}'", name);
                if let Err(error) = hook(instance.as_ref()) {
                    tracing::error!("Failed to destroy bean '{}': {:#}", name, error);
                }
            }
        }
        tracing::info!("Container closed");
    }

    pub(crate) fn advice_registry(&self) -> &AdviceRegistry {
        &self.advice_registry
    }

    pub(crate) fn definitions(&self) -> &HashMap<String, Arc<BeanDefinition>> {
        &self.definitions
    }
}

impl std::fmt::Debug for BeanFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanFactory")
            .field("definitions", &self.definitions.len())
            .field("singletons", &self.singletons.read().len())
            .field("woven", &self.woven.len())
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish()
    }
}

/// 组件形状校验：方法与通知名各自唯一，声明通知必须标记切面顺序
fn validate_definition(definition: &BeanDefinition) -> ContainerResult<()> {
    let mut method_names = std::collections::HashSet::new();
    for method in &definition.methods {
        if !method_names.insert(method.name) {
            return Err(ContainerError::UnavailableBeanClass(format!(
                "bean '{}' declares method '{}' more than once",
                definition.name, method.name
            )));
        }
    }

    let mut advice_names = std::collections::HashSet::new();
    for advice in &definition.advices {
        if !advice_names.insert(advice.method.as_str()) {
            return Err(ContainerError::UnavailableBeanClass(format!(
                "bean '{}' declares advice method '{}' more than once",
                definition.name, advice.method
            )));
        }
    }

    if !definition.advices.is_empty() && definition.aspect_order.is_none() {
        return Err(ContainerError::UnavailableBeanClass(format!(
            "bean '{}' declares advices but is not marked as an aspect",
            definition.name
        )));
    }
    Ok(())
}

/// 为每条通知声明编译切点并登记绑定
fn build_advice_registry(
    table: &HashMap<String, Arc<BeanDefinition>>,
) -> ContainerResult<AdviceRegistry> {
    let mut registry = AdviceRegistry::new();
    for definition in table.values() {
        let Some(order) = definition.aspect_order else {
            continue;
        };
        for decl in &definition.advices {
            let pointcut = Pointcut::new(decl.pattern.as_str()).map_err(|source| {
                ContainerError::InvalidPointcut {
                    pattern: decl.pattern.clone(),
                    source,
                }
            })?;
            registry.register(AdviceBinding {
                kind: decl.handler.kind(),
                pointcut,
                bean: definition.name.clone(),
                method: decl.method.clone(),
                order,
            });
        }
    }
    Ok(registry)
}
