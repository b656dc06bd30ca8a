use std::{env, path::PathBuf};

use dirs_next::home_dir;

/// Expands a leading `~` to the current user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    if trimmed == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(trimmed)
}

/// Reads a path from an environment variable, ignoring unset or blank values.
pub fn env_path_override(variable: &str) -> Option<PathBuf> {
    match env::var(variable) {
        Ok(path) if !path.trim().is_empty() => Some(expand_tilde(&path)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_untouched() {
        assert_eq!(expand_tilde(" /etc/recdata.json "), PathBuf::from("/etc/recdata.json"));
    }

    #[test]
    fn blank_override_is_ignored() {
        temp_env::with_var("RECDATA_TEST_PATH", Some("   "), || {
            assert!(env_path_override("RECDATA_TEST_PATH").is_none());
        });
        temp_env::with_var("RECDATA_TEST_PATH", Some("/tmp/schema.yaml"), || {
            assert_eq!(env_path_override("RECDATA_TEST_PATH"), Some(PathBuf::from("/tmp/schema.yaml")));
        });
    }
}
