use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::format_currency;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    pub fn price_display(&self) -> String {
        format_currency(self.price)
    }

    /// Value of the stock on hand at the current price
    pub fn stock_value(&self) -> f64 {
        self.price * self.stock as f64
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock <= 0
    }
}

/// Body for creating or updating an item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemInput {
    pub name: String,
    pub stock: i64,
    pub price: f64,
}

impl ItemInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Item name is required".to_string());
        }
        if self.price < 0.0 || self.price.is_nan() {
            return Err("Price cannot be negative".to_string());
        }
        if self.stock < 0 {
            return Err("Stock cannot be negative".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Supplier {
    /// Email, or "-" when the supplier has none
    pub fn email_display(&self) -> &str {
        if self.email.is_empty() {
            "-"
        } else {
            &self.email
        }
    }
}

/// Body for creating or updating a supplier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierInput {
    pub name: String,
    pub email: String,
    pub address: String,
}

impl SupplierInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Supplier name is required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        let json = r#"{"id":4,"name":"Kertas A4","stock":120,"price":45000,"created_at":"2024-03-14T08:00:00+07:00","updated_at":"2024-03-15T08:00:00+07:00"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.name, "Kertas A4");
        assert_eq!(item.price_display(), "Rp45.000");
        assert_eq!(item.stock_value(), 5_400_000.0);
        assert!(!item.is_out_of_stock());
    }

    #[test]
    fn test_item_input_rules() {
        let mut input = ItemInput {
            name: "Tinta".to_string(),
            stock: 0,
            price: 0.0,
        };
        assert!(input.validate().is_ok());

        input.price = -1.0;
        assert_eq!(input.validate().unwrap_err(), "Price cannot be negative");

        input.price = 10.0;
        input.stock = -3;
        assert_eq!(input.validate().unwrap_err(), "Stock cannot be negative");

        input.stock = 3;
        input.name = String::new();
        assert_eq!(input.validate().unwrap_err(), "Item name is required");

        // Only an empty name is refused; the server takes blanks as-is
        input.name = "   ".to_string();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_supplier_defaults() {
        let supplier: Supplier = serde_json::from_str(r#"{"id":1,"name":"PT Sumber Makmur"}"#).unwrap();
        assert_eq!(supplier.email_display(), "-");
        assert!(supplier.address.is_empty());

        let input = SupplierInput {
            name: String::new(),
            email: "a@b.id".to_string(),
            address: String::new(),
        };
        assert_eq!(input.validate().unwrap_err(), "Supplier name is required");
    }
}
