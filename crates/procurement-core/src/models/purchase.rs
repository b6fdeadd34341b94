use serde::{Deserialize, Serialize};

use super::{Item, Supplier, User};
use crate::utils::{format_currency, format_date};

/// A purchase transaction (header) with its lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: u64,
    /// Timestamp as sent by the server (RFC 3339)
    pub date: String,
    pub supplier_id: u64,
    #[serde(default)]
    pub supplier: Option<Supplier>,
    pub user_id: u64,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub grand_total: f64,
    #[serde(default)]
    pub details: Vec<PurchaseDetail>,
}

impl Purchase {
    pub fn total_display(&self) -> String {
        format_currency(self.grand_total)
    }

    pub fn date_display(&self) -> String {
        format_date(&self.date)
    }

    pub fn supplier_name(&self) -> &str {
        self.supplier
            .as_ref()
            .map(|s| s.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown")
    }

    pub fn total_quantity(&self) -> i64 {
        self.details.iter().map(|d| d.qty).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseDetail {
    pub id: u64,
    pub purchasing_id: u64,
    pub item_id: u64,
    #[serde(default)]
    pub item: Option<Item>,
    pub qty: i64,
    #[serde(default)]
    pub sub_total: f64,
}

impl PurchaseDetail {
    pub fn item_name(&self) -> String {
        match self.item {
            Some(ref item) if !item.name.is_empty() => item.name.clone(),
            _ => format!("Item #{}", self.item_id),
        }
    }

    pub fn sub_total_display(&self) -> String {
        format_currency(self.sub_total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseLine {
    pub item_id: u64,
    pub qty: i64,
}

/// Body for creating a purchase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPurchase {
    pub supplier_id: u64,
    pub items: Vec<PurchaseLine>,
}

impl NewPurchase {
    pub fn validate(&self) -> Result<(), String> {
        if self.supplier_id == 0 {
            return Err("Supplier ID is required".to_string());
        }
        if self.items.is_empty() {
            return Err("At least one item is required".to_string());
        }
        if self.items.iter().any(|line| line.item_id == 0 || line.qty <= 0) {
            return Err("Invalid item data: item_id and qty must be positive".to_string());
        }
        Ok(())
    }
}
