use crate::models::HealthRes;

/// Simple health service behind the `/health` endpoint
///
/// This service provides a standardised way to check the health status of Slotkeeper.
pub struct HealthService;

impl HealthService {
    /// Check health without creating an instance
    ///
    /// # Returns
    /// A `HealthRes` with status `ok`.
    pub fn check_health() -> HealthRes {
        HealthRes {
            status: "ok".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_serializes_as_status_ok() {
        let json = serde_json::to_string(&HealthService::check_health()).unwrap();
        assert_eq!(json, r#"{"status":"ok"}"#);
    }
}
