//! 属性值类型
//!
//! 字面量属性注入使用的类型化值，支持字符串、数值、布尔、数组与对象

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// 字面量属性值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// 布尔值
    Bool(bool),
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// 字符串
    String(String),
    /// 数组
    Array(Vec<PropertyValue>),
    /// 嵌套对象
    Object(HashMap<String, PropertyValue>),
}

impl PropertyValue {
    /// 作为字符串
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// 作为整数
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// 作为浮点数（整数会被放宽转换）
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// 作为布尔值
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// 作为数组
    pub fn as_array(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// 作为对象
    pub fn as_object(&self) -> Option<&HashMap<String, PropertyValue>> {
        match self {
            PropertyValue::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(PropertyValue::from("jdbc:sqlite").as_str(), Some("jdbc:sqlite"));
        assert_eq!(PropertyValue::from(42i64).as_i64(), Some(42));
        assert_eq!(PropertyValue::from(42i64).as_f64(), Some(42.0));
        assert_eq!(PropertyValue::from(true).as_bool(), Some(true));
        assert_eq!(PropertyValue::from(1.5f64).as_str(), None);
    }

    #[test]
    fn test_nested_values() {
        let mut map = HashMap::new();
        map.insert("port".to_string(), PropertyValue::from(8080i64));
        let value = PropertyValue::Object(map);

        let port = value.as_object().and_then(|m| m.get("port")).and_then(|v| v.as_i64());
        assert_eq!(port, Some(8080));

        let array = PropertyValue::Array(vec![PropertyValue::from(1i64), PropertyValue::from(2i64)]);
        assert_eq!(array.as_array().map(|items| items.len()), Some(2));
    }
}
