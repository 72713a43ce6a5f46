use crate::transport::http::{HttpTransport, RetryPolicy, TRANSLATE_TIMEOUT_MS};

#[test]
fn test_transport_exports_compile() {
    let transport = HttpTransport::new(TRANSLATE_TIMEOUT_MS, RetryPolicy::none());
    assert!(transport.is_ok());
    assert_eq!(
        transport.map(|transport| transport.timeout_ms()).ok(),
        Some(60_000)
    );
}
