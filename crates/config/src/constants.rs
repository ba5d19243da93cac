//! Environment variable names understood by xscan

pub const ENV_URL: &str = "XSCAN_URL";
pub const ENV_ACCESS_TOKEN: &str = "XSCAN_ACCESS_TOKEN";
pub const ENV_USER: &str = "XSCAN_USER";
pub const ENV_PASSWORD: &str = "XSCAN_PASSWORD";
pub const ENV_COLOR: &str = "XSCAN_COLOR";
pub const ENV_TIMEOUT: &str = "XSCAN_TIMEOUT";
pub const ENV_RETRIES: &str = "XSCAN_RETRIES";

/// Enables the verification harness against a live service
pub const ENV_TESTS: &str = "XSCAN_TESTS";
/// Root directory of the fixture projects used by the harness
pub const ENV_TEST_RESOURCES: &str = "XSCAN_TEST_RESOURCES";
