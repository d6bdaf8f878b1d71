//! `uihealth validate`.

use std::process::ExitCode;

use serde_json::json;

use uihealth_config::{Config, ConfigValidator, ValidationResult};

use crate::print_json;

pub(crate) fn run_validate(config: &Config) -> ExitCode {
    let result = ConfigValidator::validate(config);
    print_json(&summary(config, &result));

    if result.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn summary(config: &Config, result: &ValidationResult) -> serde_json::Value {
    json!({
        "ok": result.is_valid(),
        "errors": result.errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "warnings": result.warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "pages": config.registry().len(),
    })
}
