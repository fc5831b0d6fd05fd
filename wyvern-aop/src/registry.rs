//! 通知注册表
//!
//! 容器构造期间逐条登记通知绑定，织入完成后只读

use crate::advice::AdviceKind;
use crate::pointcut::{advice_key, Pointcut};

/// 一条方法级通知绑定
#[derive(Debug, Clone)]
pub struct AdviceBinding {
    /// 通知类型
    pub kind: AdviceKind,
    /// 切点模式
    pub pointcut: Pointcut,
    /// 提供通知的切面 Bean 名称
    pub bean: String,
    /// 切面上的通知方法名
    pub method: String,
    /// 同组内 order 越大越先执行
    pub order: i32,
}

/// 通知绑定索引
#[derive(Debug, Default)]
pub struct AdviceRegistry {
    bindings: Vec<AdviceBinding>,
}

impl AdviceRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一条绑定
    pub fn register(&mut self, binding: AdviceBinding) {
        tracing::debug!(
            "Registering {} advice '{}::{}' with pointcut '{}'",
            binding.kind,
            binding.bean,
            binding.method,
            binding.pointcut.pattern()
        );
        self.bindings.push(binding);
    }

    /// 选出匹配指定方法的某类通知，按 order 降序
    ///
    /// 排序稳定：order 相同的绑定保持登记顺序
    pub fn select(
        &self,
        kind: AdviceKind,
        target_type: &str,
        method_name: &str,
    ) -> Vec<&AdviceBinding> {
        let key = advice_key(target_type, method_name);
        let mut matched: Vec<&AdviceBinding> = self
            .bindings
            .iter()
            .filter(|binding| binding.kind == kind && binding.pointcut.matches_key(&key))
            .collect();
        matched.sort_by(|a, b| b.order.cmp(&a.order));
        matched
    }

    /// 绑定总数
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// 是否没有任何绑定
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(kind: AdviceKind, pattern: &str, bean: &str, order: i32) -> AdviceBinding {
        AdviceBinding {
            kind,
            pointcut: Pointcut::new(pattern).unwrap(),
            bean: bean.to_string(),
            method: "advise".to_string(),
            order,
        }
    }

    #[test]
    fn test_select_filters_by_kind_and_key() {
        let mut registry = AdviceRegistry::new();
        registry.register(binding(AdviceKind::Before, "UserService .*", "LogAspect", 0));
        registry.register(binding(AdviceKind::After, "UserService .*", "LogAspect", 0));
        registry.register(binding(AdviceKind::Before, "OrderService .*", "TxAspect", 0));

        let selected = registry.select(AdviceKind::Before, "UserService", "save");
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].bean, "LogAspect");
    }

    #[test]
    fn test_select_orders_descending() {
        let mut registry = AdviceRegistry::new();
        registry.register(binding(AdviceKind::Before, "Calc run", "A", 1));
        registry.register(binding(AdviceKind::Before, "Calc run", "B", 5));
        registry.register(binding(AdviceKind::Before, "Calc run", "C", 3));

        let selected = registry.select(AdviceKind::Before, "Calc", "run");
        let order: Vec<i32> = selected.iter().map(|b| b.order).collect();
        assert_eq!(order, vec![5, 3, 1]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let mut registry = AdviceRegistry::new();
        registry.register(binding(AdviceKind::Before, "Calc run", "First", 2));
        registry.register(binding(AdviceKind::Before, "Calc run", "Second", 2));

        let selected = registry.select(AdviceKind::Before, "Calc", "run");
        let beans: Vec<&str> = selected.iter().map(|b| b.bean.as_str()).collect();
        assert_eq!(beans, vec!["First", "Second"]);
    }
}
