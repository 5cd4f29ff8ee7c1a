// crates/cert-ledger-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for cert-ledger-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use cert_ledger_config::CertLedgerConfig;
use cert_ledger_config::ConfigError;

/// Test outcome carrying a readable failure message.
pub type TestResult = Result<(), String>;

/// Parses a TOML string into a `CertLedgerConfig` for tests.
pub fn config_from_toml(toml_str: &str) -> Result<CertLedgerConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a valid sqlite config whose database lives at `path`.
pub fn sqlite_config(path: &str) -> Result<CertLedgerConfig, toml::de::Error> {
    config_from_toml(&format!(
        "[store]\ntype = \"sqlite\"\n\n[store.sqlite]\npath = '{path}'\ninitialize_schema = \
         true\n"
    ))
}

/// Checks that `result` is an error whose message contains `needle`.
pub fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}
