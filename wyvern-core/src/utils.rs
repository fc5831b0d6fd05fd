//! 工具函数模块

/// 命名转换工具
pub mod naming {
    /// 将 snake_case 字段名转换为 PascalCase
    ///
    /// 自动装配字段不指明目标时，目标 Bean 名由字段名推导：
    /// `user_dao` 对应名为 `UserDao` 的 Bean
    pub fn to_pascal_case(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for word in s.split('_') {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                result.extend(first.to_uppercase());
                result.push_str(chars.as_str());
            }
        }
        result
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_to_pascal_case() {
            assert_eq!(to_pascal_case("user_dao"), "UserDao");
            assert_eq!(to_pascal_case("order_service_impl"), "OrderServiceImpl");
            assert_eq!(to_pascal_case("dao"), "Dao");
            assert_eq!(to_pascal_case(""), "");
        }

        #[test]
        fn test_consecutive_underscores() {
            assert_eq!(to_pascal_case("user__dao"), "UserDao");
            assert_eq!(to_pascal_case("_dao"), "Dao");
        }
    }
}
