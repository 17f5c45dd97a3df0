use serde::Serialize;

/// Uniform response envelope for every endpoint. Clients branch on `success`.
#[derive(Serialize, Debug, Clone)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_omits_data() {
        let json = serde_json::to_value(ApiResponse::error("Usulan tidak ditemukan")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Usulan tidak ditemukan");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn ok_envelope_carries_data() {
        let json = serde_json::to_value(ApiResponse::ok("ok", vec![1, 2])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }
}
