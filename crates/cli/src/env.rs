use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::CliError;
use tracing::debug;

pub const DEFAULT_ENV_FILE: &str = ".env";

/// Environment variable manager that merges the process environment with a
/// .env file. Process variables win over file entries; explicit overrides
/// win over both.
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    /// Load variables from a .env file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        let loaded = self.parse_env_content(&content)?;
        debug!(path = %path.display(), loaded, "Loaded env file");
        Ok(loaded)
    }

    /// Loads `.env` from the working directory when there is one.
    pub fn load_default_file(&mut self) -> Result<usize, CliError> {
        let path = Path::new(DEFAULT_ENV_FILE);
        if path.is_file() {
            self.load_from_file(path)
        } else {
            Ok(0)
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.vars.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn all(&self) -> &HashMap<String, String> {
        &self.vars
    }

    /// Returns how many entries were taken from the file.
    fn parse_env_content(&mut self, content: &str) -> Result<usize, CliError> {
        let mut loaded = 0;
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);

            // Parse KEY=VALUE format
            if let Some(eq_pos) = line.find('=') {
                let key = line[..eq_pos].trim();
                let value = line[eq_pos + 1..].trim();

                if key.is_empty() {
                    return Err(CliError::Config(format!(
                        "Invalid env file: empty key at line {}",
                        line_num + 1
                    )));
                }

                if !self.vars.contains_key(key) {
                    self.vars
                        .insert(key.to_string(), Self::unquote_value(value));
                    loaded += 1;
                }
            } else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            }
        }

        Ok(loaded)
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        // Handle double quotes
        if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
            return value[1..value.len() - 1].to_string();
        }

        // Handle single quotes
        if value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2 {
            return value[1..value.len() - 1].to_string();
        }

        value.to_string()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn empty() -> EnvManager {
        EnvManager::from_vars(HashMap::new())
    }

    #[test]
    fn test_parse_basic_env() {
        let mut env = empty();
        let content = r#"
# Comment
DBSHIFT_SOURCE_URL=postgresql://postgres@localhost/postgres
export DBSHIFT_BATCH_SIZE=500
        "#;

        assert_eq!(env.parse_env_content(content).unwrap(), 2);
        assert_eq!(
            env.get("DBSHIFT_SOURCE_URL"),
            Some("postgresql://postgres@localhost/postgres")
        );
        assert_eq!(env.get("DBSHIFT_BATCH_SIZE"), Some("500"));
    }

    #[test]
    fn test_parse_quoted_values() {
        let mut env = empty();
        let content = r#"
QUOTED="value with spaces"
SINGLE='single quoted'
UNQUOTED=no_spaces
URL=postgresql://u:p@h/db?sslmode=require
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("QUOTED"), Some("value with spaces"));
        assert_eq!(env.get("SINGLE"), Some("single quoted"));
        assert_eq!(env.get("UNQUOTED"), Some("no_spaces"));
        assert_eq!(env.get("URL"), Some("postgresql://u:p@h/db?sslmode=require"));
    }

    #[test]
    fn test_invalid_env_format() {
        let mut env = empty();
        assert!(env.parse_env_content("INVALID LINE WITHOUT EQUALS").is_err());
        assert!(env.parse_env_content("=value").is_err());
    }

    #[test]
    fn test_process_env_wins_over_file() {
        let mut env = EnvManager::from_vars(HashMap::from([(
            "DBSHIFT_BATCH_SIZE".to_string(),
            "250".to_string(),
        )]));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DBSHIFT_BATCH_SIZE=10").unwrap();
        writeln!(file, "DBSHIFT_SCHEMA=sales").unwrap();

        assert_eq!(env.load_from_file(file.path()).unwrap(), 1);
        assert_eq!(env.get("DBSHIFT_BATCH_SIZE"), Some("250"));
        assert_eq!(env.get("DBSHIFT_SCHEMA"), Some("sales"));

        env.set("DBSHIFT_BATCH_SIZE", "5");
        assert_eq!(env.get("DBSHIFT_BATCH_SIZE"), Some("5"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut env = empty();
        let err = env.load_from_file(dir.path().join("missing.env")).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
