use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::handler::Handler;

/// A handler set loaded from a configuration file.
#[derive(Debug, Deserialize, Serialize)]
pub struct HandlersConfig {
    pub handlers: Vec<Handler>,
}

impl HandlersConfig {
    /// Load and validate a handler set from a YAML or JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .build()?;
        let loaded: Self = settings.try_deserialize()?;

        for handler in &loaded.handlers {
            handler
                .validate()
                .map_err(|e| anyhow::anyhow!("handler '{}': {}", handler.name, e))?;
        }

        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_valid_handler_set() {
        let file = write_config(
            r#"
handlers:
  - name: slack
    type: pipe
    command: handler-slack
    environment: default
    organization: default
    filters:
      - action: deny
        statements:
          - "event.status == 1"
"#,
        );

        let config = HandlersConfig::load(file.path()).unwrap();
        assert_eq!(config.handlers.len(), 1);
        assert_eq!(config.handlers[0].name, "slack");
        assert_eq!(config.handlers[0].filters[0].statements.len(), 1);
    }

    #[test]
    fn rejects_a_handler_missing_tenant_scope() {
        let file = write_config(
            r#"
handlers:
  - name: slack
    type: pipe
    environment: default
    organization: ""
"#,
        );

        let err = HandlersConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("organization"));
    }

    #[test]
    fn rejects_a_filter_with_a_malformed_statement() {
        let file = write_config(
            r#"
handlers:
  - name: slack
    type: pipe
    environment: default
    organization: default
    filters:
      - action: allow
        statements:
          - "event.status =="
"#,
        );

        assert!(HandlersConfig::load(file.path()).is_err());
    }
}
