//! Handler and filter definitions plus their validation rules.

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

use crate::expr::compile_statement;

static NAME_PATTERN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[\w.\-]+$").unwrap());

/// Validation failure for a handler or filter definition.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("handler name {0}")]
    Name(String),
    #[error("environment must be set")]
    Environment,
    #[error("organization must be set")]
    Organization,
    #[error("filter {index}: unrecognized action")]
    UnknownAction { index: usize },
    #[error("filter {index}, statement {statement}: {source}")]
    Statement {
        index: usize,
        statement: usize,
        source: anyhow::Error,
    },
}

/// What a filter does when all of its statements match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterAction {
    Allow,
    Deny,
    /// Error state for an action value this crate does not recognize. Never a
    /// silent default: validation rejects it and the gate fails open on it.
    #[serde(other)]
    Unknown,
}

/// An ordered list of boolean statements plus an allow/deny action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    pub action: FilterAction,
    #[serde(default)]
    pub statements: Vec<String>,
}

impl Filter {
    /// Check that the action is recognized and every statement compiles.
    /// `index` is the filter's position in its handler's list, for error
    /// context.
    pub fn validate(&self, index: usize) -> Result<(), ValidationError> {
        if self.action == FilterAction::Unknown {
            return Err(ValidationError::UnknownAction { index });
        }

        for (i, statement) in self.statements.iter().enumerate() {
            compile_statement(statement).map_err(|e| ValidationError::Statement {
                index,
                statement: i + 1,
                source: e,
            })?;
        }

        Ok(())
    }
}

/// The delivery mechanism a handler uses. Opaque to the filtering gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerKind {
    Pipe,
    Tcp,
    Udp,
    Set,
}

/// Peer address for a TCP or UDP handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerSocket {
    pub host: String,
    pub port: u16,
}

/// A named delivery target with the filters to apply before invocation.
///
/// The gate reads only `filters`; the remaining fields describe delivery and
/// ownership and are consumed by the surrounding pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Handler {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: HandlerKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mutator: Option<String>,

    /// Command to execute for a pipe handler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Handler timeout in seconds.
    #[serde(default)]
    pub timeout: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<HandlerSocket>,

    /// Member handler names for a set handler.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub handlers: Vec<String>,

    /// Filters to evaluate before invoking this handler, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,

    /// Environment variables for command execution.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,

    /// Environment this handler belongs to.
    pub environment: String,

    /// Organization this handler belongs to.
    pub organization: String,
}

impl Handler {
    /// Check that the handler is well formed: valid name, non-empty tenant
    /// scope, and valid filters.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name).map_err(ValidationError::Name)?;

        if self.environment.is_empty() {
            return Err(ValidationError::Environment);
        }

        if self.organization.is_empty() {
            return Err(ValidationError::Organization);
        }

        for (i, filter) in self.filters.iter().enumerate() {
            filter.validate(i + 1)?;
        }

        Ok(())
    }
}

/// Names may contain word characters, dots, and hyphens, and must be
/// non-empty.
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("must not be empty".to_string());
    }
    if !NAME_PATTERN.is_match(name) {
        return Err("cannot contain spaces or special characters".to_string());
    }
    Ok(())
}
