use std::path::{Component, Path, PathBuf};

use crate::constants::CREDENTIAL_FIELD_LENGTH;
use crate::error::AppError;

/// Validates a single required credential component.
///
/// # Arguments
/// * `name` - Environment variable name, used in the error message
/// * `value` - Raw value, `None` when the variable is unset
///
/// # Returns
/// * `Ok(String)` - The value, unchanged
/// * `Err(AppError)` - The value is missing or has the wrong length
///
/// # Validation Rules
/// - The variable must be set
/// - The value must be exactly `CREDENTIAL_FIELD_LENGTH` characters long
pub fn validate_credential_field(name: &str, value: Option<&str>) -> Result<String, AppError> {
    let Some(value) = value else {
        return Err(invalid_env(name, "is required", "required", "<unset>"));
    };

    if value.chars().count() != CREDENTIAL_FIELD_LENGTH {
        return Err(invalid_env(
            name,
            &format!("must be exactly {CREDENTIAL_FIELD_LENGTH} characters"),
            "length",
            value,
        ));
    }

    Ok(value.to_string())
}

/// Validates the snapshot directory. Git reports changes relative to the
/// repository, so the directory must stay inside it: no absolute paths and
/// no `..` components.
pub fn validate_output_dir(name: &str, value: &str) -> Result<PathBuf, AppError> {
    let path = Path::new(value);
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::Prefix(_) | Component::RootDir | Component::ParentDir
        )
    });

    if escapes {
        return Err(invalid_env(
            name,
            "must be a relative path inside the repository",
            "relative",
            value,
        ));
    }

    Ok(path.to_path_buf())
}

/// Interprets an optional kill-switch string. Only `true`, in any case, enables it.
pub fn is_switch_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Treats empty optional values the same as unset ones.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn invalid_env(name: &str, problem: &str, rule: &str, value: &str) -> AppError {
    AppError::config_error(format!(
        "Invalid environment config: {name} {problem} (rule: {rule}), value is '{value}'"
    ))
}
