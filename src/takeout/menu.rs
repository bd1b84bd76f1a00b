//! 菜单与购物车的合并
//!
//! 购物车变化后重新计算每个菜品 / 套餐的数量并写回当前展示的列表。
//! 合并是纯函数：相同的购物车得到相同的结果，也不会触发菜单重新加载。

use crate::takeout::models::{CartItem, Dish, DishFlavor, Setmeal};
use std::collections::HashMap;

/// 购物车数量表的键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CartKey {
    Dish(String),
    Setmeal(String),
}

/// 可以展示购物车数量的菜单条目
pub trait CartCounted {
    fn cart_key(&self) -> CartKey;
    fn set_cart_number(&mut self, number: Option<i32>);
}

impl CartCounted for Dish {
    fn cart_key(&self) -> CartKey {
        CartKey::Dish(self.id.clone())
    }

    fn set_cart_number(&mut self, number: Option<i32>) {
        self.dish_number = number;
    }
}

impl CartCounted for Setmeal {
    fn cart_key(&self) -> CartKey {
        CartKey::Setmeal(self.id.clone())
    }

    fn set_cart_number(&mut self, number: Option<i32>) {
        self.setmeal_number = number;
    }
}

/// 按菜品 / 套餐 ID 汇总购物车数量（同一菜品不同口味累加）
pub fn quantity_map(cart: &[CartItem]) -> HashMap<CartKey, i32> {
    let mut counts = HashMap::new();
    for item in cart {
        let key = match (&item.setmeal_id, &item.dish_id) {
            (Some(setmeal_id), _) => CartKey::Setmeal(setmeal_id.clone()),
            (None, Some(dish_id)) => CartKey::Dish(dish_id.clone()),
            (None, None) => continue,
        };
        *counts.entry(key).or_insert(0) += item.number;
    }
    counts
}

/// 把购物车数量合并进菜单列表，不在购物车中（或数量不大于 0）的条目清空数量
pub fn merge_with_cart<T>(items: &[T], quantities: &HashMap<CartKey, i32>) -> Vec<T>
where
    T: CartCounted + Clone,
{
    items
        .iter()
        .map(|item| {
            let mut merged = item.clone();
            let number = quantities
                .get(&item.cart_key())
                .copied()
                .filter(|n| *n > 0);
            merged.set_cart_number(number);
            merged
        })
        .collect()
}

/// 去掉数量不大于 0 的购物车条目
pub fn visible_cart(items: Vec<CartItem>) -> Vec<CartItem> {
    items.into_iter().filter(|item| item.number > 0).collect()
}

/// 购物车合计
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CartSummary {
    /// Σ 单价 × 数量
    pub total_amount: f64,
    /// Σ 数量
    pub total_count: i32,
}

pub fn cart_summary(cart: &[CartItem]) -> CartSummary {
    cart.iter().fold(CartSummary::default(), |acc, item| CartSummary {
        total_amount: acc.total_amount + item.amount * f64::from(item.number),
        total_count: acc.total_count + item.number,
    })
}

// ========== 口味 ==========

/// 解析口味可选值：字符串数组、JSON 编码的数组、逗号分隔的字符串或单个值
pub fn normalize_flavor_values(value: &serde_json::Value) -> Vec<String> {
    use serde_json::Value;

    fn strings_of(values: &[Value]) -> Vec<String> {
        values
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    match value {
        Value::Array(values) => strings_of(values),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Vec::new();
            }
            if let Ok(Value::Array(values)) = serde_json::from_str::<Value>(trimmed) {
                return strings_of(&values);
            }
            if trimmed.contains(',') {
                return trimmed
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            vec![trimmed.to_string()]
        }
        _ => Vec::new(),
    }
}

/// 口味选择（口味名 -> 选中值）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlavorSelection {
    selected: HashMap<String, String>,
}

impl FlavorSelection {
    /// 默认选择每个口味的第一个可选值
    pub fn with_defaults(flavors: &[DishFlavor]) -> Self {
        let selected = flavors
            .iter()
            .filter_map(|flavor| {
                normalize_flavor_values(&flavor.value)
                    .into_iter()
                    .next()
                    .map(|first| (flavor.name.clone(), first))
            })
            .collect();
        Self { selected }
    }

    pub fn select(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.selected.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.selected.get(name).map(String::as_str)
    }

    /// 口味文本，按菜品口味顺序拼成 `名称:值`，以 `、` 连接；未选择的口味取第一个可选值
    pub fn text(&self, flavors: &[DishFlavor]) -> String {
        flavors
            .iter()
            .filter_map(|flavor| {
                let selected = self
                    .get(&flavor.name)
                    .map(str::to_string)
                    .or_else(|| normalize_flavor_values(&flavor.value).into_iter().next())?;
                Some(format!("{}:{}", flavor.name, selected))
            })
            .collect::<Vec<_>>()
            .join("、")
    }
}
