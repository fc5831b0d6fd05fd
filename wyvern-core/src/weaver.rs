//! 方法织入
//!
//! 容器构造时运行一次：为每个受管方法按规范键选出五组匹配的通知，
//! 全部为空的方法保持原样，否则解析切面 Bean、绑定通知回调并生成
//! `WovenMethod`。织入不可逆，也不会在构造之后重跑

use std::collections::HashMap;
use std::sync::Arc;

use wyvern_aop::{AdviceBinding, AdviceHandler, AdviceKind, BoundAdvice, WovenMethod};

use crate::bean::{BeanDefinition, MethodDescriptor};
use crate::bean_factory::BeanFactory;
use crate::error::{ContainerError, ContainerResult};

pub(crate) type WovenTable = HashMap<(&'static str, &'static str), Arc<WovenMethod>>;

/// 对容器里的所有受管方法执行织入
pub(crate) fn weave(factory: &BeanFactory) -> ContainerResult<WovenTable> {
    let mut table = WovenTable::new();
    for definition in factory.definitions().values() {
        for method in &definition.methods {
            if let Some(woven) = weave_method(factory, definition, method)? {
                tracing::debug!("Woven method {}::{}", definition.type_name, method.name);
                table.insert((definition.type_name, method.name), Arc::new(woven));
            }
        }
    }
    Ok(table)
}

fn weave_method(
    factory: &BeanFactory,
    definition: &BeanDefinition,
    method: &MethodDescriptor,
) -> ContainerResult<Option<WovenMethod>> {
    let registry = factory.advice_registry();
    let type_name = definition.type_name;

    let before = bind(
        factory,
        registry.select(AdviceKind::Before, type_name, method.name),
        |handler| match handler {
            AdviceHandler::Before(f) => Some(Arc::clone(f)),
            _ => None,
        },
    )?;
    let around = bind(
        factory,
        registry.select(AdviceKind::Around, type_name, method.name),
        |handler| match handler {
            AdviceHandler::Around(f) => Some(Arc::clone(f)),
            _ => None,
        },
    )?;
    let after_returning = bind(
        factory,
        registry.select(AdviceKind::AfterReturning, type_name, method.name),
        |handler| match handler {
            AdviceHandler::AfterReturning(f) => Some(Arc::clone(f)),
            _ => None,
        },
    )?;
    let after_throwing = bind(
        factory,
        registry.select(AdviceKind::AfterThrowing, type_name, method.name),
        |handler| match handler {
            AdviceHandler::AfterThrowing(f) => Some(Arc::clone(f)),
            _ => None,
        },
    )?;
    let after = bind(
        factory,
        registry.select(AdviceKind::After, type_name, method.name),
        |handler| match handler {
            AdviceHandler::After(f) => Some(Arc::clone(f)),
            _ => None,
        },
    )?;

    if before.is_empty()
        && around.is_empty()
        && after_returning.is_empty()
        && after_throwing.is_empty()
        && after.is_empty()
    {
        return Ok(None);
    }

    Ok(Some(WovenMethod {
        target_type: type_name,
        method_name: method.name,
        params: method.params,
        target: Arc::clone(&method.handler),
        before,
        around,
        after_returning,
        after_throwing,
        after,
    }))
}

/// 解析切面 Bean 并把绑定落到具体回调上
///
/// 绑定列表来自注册表，已按 order 降序；这里保持顺序不变
fn bind<F>(
    factory: &BeanFactory,
    bindings: Vec<&AdviceBinding>,
    extract: impl Fn(&AdviceHandler) -> Option<F>,
) -> ContainerResult<Vec<BoundAdvice<F>>> {
    let mut bound = Vec::with_capacity(bindings.len());
    for binding in bindings {
        let aspect = factory.get(&binding.bean)?;
        let definition = factory
            .definitions()
            .get(&binding.bean)
            .ok_or_else(|| ContainerError::BeanNotFound(binding.bean.clone()))?;
        let decl = definition.find_advice(&binding.method).ok_or_else(|| {
            ContainerError::WeavingFailed {
                target: format!("{}::{}", binding.bean, binding.method),
                reason: "advice method not declared".to_string(),
            }
        })?;
        let handler = extract(&decl.handler).ok_or_else(|| ContainerError::WeavingFailed {
            target: format!("{}::{}", binding.bean, binding.method),
            reason: format!("advice kind mismatch, expected {}", binding.kind),
        })?;
        bound.push(BoundAdvice {
            aspect,
            handler,
            order: binding.order,
        });
    }
    Ok(bound)
}
