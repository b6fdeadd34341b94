//! Data models for the procurement backend.
//!
//! - `User`, `LoginData`: accounts and the login payload
//! - `Item`, `Supplier`: master data
//! - `Purchase`, `PurchaseDetail`: purchase transactions
//!
//! Request bodies (`*Input`, `NewPurchase`) validate themselves with the same
//! rules the server applies, so obviously bad input never leaves the client.

pub mod inventory;
pub mod purchase;
pub mod user;

pub use inventory::{Item, ItemInput, Supplier, SupplierInput};
pub use purchase::{NewPurchase, Purchase, PurchaseDetail, PurchaseLine};
pub use user::{Credentials, LoginData, Registration, User};
