//! Custom assertion macros for HTTP tests

/// Assert an HTTP response's status and `message` field
#[macro_export]
macro_rules! assert_rejected {
    ($response:expr, $status:expr, $message:expr) => {{
        let response = $response;
        assert_eq!(response.status_code(), $status);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["message"], $message, "unexpected error body: {}", body);
    }};
}
