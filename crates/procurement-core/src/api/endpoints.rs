//! Typed calls for each backend endpoint.
//!
//! Each method validates its input the way the server would, sends the
//! request through the dispatcher, and unwraps the `{success, message, data}`
//! envelope.

use reqwest::Method;
use tracing::{debug, info};

use super::client::{ApiClient, OnUnauthorized};
use super::{ApiError, ApiResponse};
use crate::models::{
    Credentials, Item, ItemInput, LoginData, NewPurchase, Purchase, Registration, Supplier,
    SupplierInput, User,
};

fn validated(check: Result<(), String>) -> Result<(), ApiError> {
    check.map_err(ApiError::Validation)
}

impl ApiClient {
    // ===== Auth =====

    /// Log in and store the returned token and user in the session.
    ///
    /// A 401 here means bad credentials, so it does not trigger the
    /// session-expired logout and comes back as `InvalidCredentials` with
    /// the server's message.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginData, ApiError> {
        validated(credentials.validate())?;

        let response: ApiResponse<LoginData> = self
            .dispatch(
                Method::POST,
                "/auth/login",
                Some(credentials),
                OnUnauthorized::PassThrough,
            )
            .await
            .map_err(ApiError::into_credentials_error)?;
        let data = response.into_data()?;

        self.session()
            .set_token(&data.token)
            .map_err(ApiError::storage)?;
        self.session()
            .set_user(&data.user)
            .map_err(ApiError::storage)?;

        info!(username = %data.user.username, "Logged in");
        Ok(data)
    }

    pub async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        validated(registration.validate())?;

        let response: ApiResponse<User> = self
            .dispatch(
                Method::POST,
                "/auth/register",
                Some(registration),
                OnUnauthorized::PassThrough,
            )
            .await
            .map_err(ApiError::into_credentials_error)?;
        response.into_data()
    }

    /// Fetch the profile of the logged-in user and refresh the stored copy
    pub async fn profile(&self) -> Result<User, ApiError> {
        let response: ApiResponse<User> = self.get("/profile").await?;
        let user = response.into_data()?;
        self.session().set_user(&user).map_err(ApiError::storage)?;
        Ok(user)
    }

    // ===== Items =====

    pub async fn list_items(&self) -> Result<Vec<Item>, ApiError> {
        let response: ApiResponse<Vec<Item>> = self.get("/items/").await?;
        let items = response.into_data()?;
        debug!(count = items.len(), "Fetched items");
        Ok(items)
    }

    pub async fn get_item(&self, id: u64) -> Result<Item, ApiError> {
        let response: ApiResponse<Item> = self.get(&format!("/items/{}", id)).await?;
        response.into_data()
    }

    pub async fn create_item(&self, input: &ItemInput) -> Result<Item, ApiError> {
        validated(input.validate())?;
        let response: ApiResponse<Item> = self.post("/items/", input).await?;
        response.into_data()
    }

    pub async fn update_item(&self, id: u64, input: &ItemInput) -> Result<Item, ApiError> {
        validated(input.validate())?;
        let response: ApiResponse<Item> = self.put(&format!("/items/{}", id), input).await?;
        response.into_data()
    }

    /// Delete an item, returning the server's confirmation message
    pub async fn delete_item(&self, id: u64) -> Result<Option<String>, ApiError> {
        let response: ApiResponse<serde_json::Value> =
            self.delete(&format!("/items/{}", id)).await?;
        Ok(response.message)
    }

    // ===== Suppliers =====

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, ApiError> {
        let response: ApiResponse<Vec<Supplier>> = self.get("/suppliers/").await?;
        let suppliers = response.into_data()?;
        debug!(count = suppliers.len(), "Fetched suppliers");
        Ok(suppliers)
    }

    pub async fn get_supplier(&self, id: u64) -> Result<Supplier, ApiError> {
        let response: ApiResponse<Supplier> = self.get(&format!("/suppliers/{}", id)).await?;
        response.into_data()
    }

    pub async fn create_supplier(&self, input: &SupplierInput) -> Result<Supplier, ApiError> {
        validated(input.validate())?;
        let response: ApiResponse<Supplier> = self.post("/suppliers/", input).await?;
        response.into_data()
    }

    pub async fn update_supplier(
        &self,
        id: u64,
        input: &SupplierInput,
    ) -> Result<Supplier, ApiError> {
        validated(input.validate())?;
        let response: ApiResponse<Supplier> =
            self.put(&format!("/suppliers/{}", id), input).await?;
        response.into_data()
    }

    pub async fn delete_supplier(&self, id: u64) -> Result<Option<String>, ApiError> {
        let response: ApiResponse<serde_json::Value> =
            self.delete(&format!("/suppliers/{}", id)).await?;
        Ok(response.message)
    }

    // ===== Purchases =====

    pub async fn list_purchases(&self) -> Result<Vec<Purchase>, ApiError> {
        let response: ApiResponse<Vec<Purchase>> = self.get("/purchases/").await?;
        let purchases = response.into_data()?;
        debug!(count = purchases.len(), "Fetched purchases");
        Ok(purchases)
    }

    pub async fn get_purchase(&self, id: u64) -> Result<Purchase, ApiError> {
        let response: ApiResponse<Purchase> = self.get(&format!("/purchases/{}", id)).await?;
        response.into_data()
    }

    pub async fn create_purchase(&self, purchase: &NewPurchase) -> Result<Purchase, ApiError> {
        validated(purchase.validate())?;
        let response: ApiResponse<Purchase> = self.post("/purchases/", purchase).await?;
        response.into_data()
    }
}
