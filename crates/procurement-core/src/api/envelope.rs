use serde::{Deserialize, Serialize};

use super::ApiError;

/// Wrapper the backend puts around every JSON response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, treating a missing `data` field as a bad response
    pub fn into_data(self) -> Result<T, ApiError> {
        match self.data {
            Some(data) => Ok(data),
            None => Err(ApiError::InvalidResponse(
                self.message
                    .unwrap_or_else(|| "response carried no data".to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_data() {
        let resp: ApiResponse<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2, 3]}"#).unwrap();
        assert!(resp.success);
        assert_eq!(resp.into_data().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_message_only_response() {
        let resp: ApiResponse<serde_json::Value> =
            serde_json::from_str(r#"{"success": true, "message": "Item deleted successfully"}"#)
                .unwrap();
        assert_eq!(resp.message.as_deref(), Some("Item deleted successfully"));
        assert!(matches!(
            resp.into_data(),
            Err(ApiError::InvalidResponse(ref m)) if m == "Item deleted successfully"
        ));
    }
}
