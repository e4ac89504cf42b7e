use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    /// When set (dev mode), 500 bodies carry the underlying error text
    /// instead of the per-endpoint generic message.
    pub expose_error_detail: bool,
    pub service_name: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 10 * 1024 * 1024,
            expose_error_detail: false,
            service_name: "Questionnaire Scoring API".to_string(),
        }
    }
}

pub fn validate_startup_config(api: &ApiConfig) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("max body bytes must be > 0".to_string());
    }
    if api.service_name.trim().is_empty() {
        return Err("service name must not be empty".to_string());
    }
    Ok(())
}
