use std::path::PathBuf;

/// All errors that can abort a region conversion.
///
/// Malformed parameter streams and unknown mod kinds are tolerated and
/// never produce one of these.
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    /// Lexing or parsing of the RDL text failed.
    #[error("{file}:{line}: {message}")]
    Syntax {
        file: String,
        line: u32,
        message: String,
    },

    /// The parse tree lacks a named group the builder requires.
    #[error("malformed input: missing '{group}' group")]
    MalformedInput { group: String },

    /// A required primary parameter (x, y, or) is absent on a mod.
    #[error("missing required field '{field}' on mod {kind}.{identity}")]
    MissingField {
        field: String,
        kind: String,
        identity: String,
    },

    /// A parameter that must be an integer could not be parsed as one.
    #[error("invalid integer '{value}' for field '{field}' on mod {kind}.{identity}")]
    InvalidNumber {
        field: String,
        value: String,
        kind: String,
        identity: String,
    },

    /// The field translation table could not be loaded or understood.
    #[error("invalid mod index: {0}")]
    Config(String),

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RegionError {
    pub fn syntax(file: &str, line: u32, message: impl Into<String>) -> Self {
        RegionError::Syntax {
            file: file.to_owned(),
            line,
            message: message.into(),
        }
    }

    pub fn malformed(group: &str) -> Self {
        RegionError::MalformedInput {
            group: group.to_owned(),
        }
    }

    /// Short machine-readable tag for the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            RegionError::Syntax { .. } => "syntax",
            RegionError::MalformedInput { .. } => "malformed_input",
            RegionError::MissingField { .. } => "missing_field",
            RegionError::InvalidNumber { .. } => "invalid_number",
            RegionError::Config(_) => "config",
            RegionError::Io { .. } => "io",
        }
    }

    /// Serialize for `--output json` error reports.
    /// Always carries `kind` and `message`; location fields only where known.
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut v = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        match self {
            RegionError::Syntax { file, line, .. } => {
                v["file"] = serde_json::json!(file);
                v["line"] = serde_json::json!(line);
            }
            RegionError::MissingField {
                field,
                kind,
                identity,
            }
            | RegionError::InvalidNumber {
                field,
                kind,
                identity,
                ..
            } => {
                v["field"] = serde_json::json!(field);
                v["mod_kind"] = serde_json::json!(kind);
                v["mod_id"] = serde_json::json!(identity);
            }
            RegionError::Io { path, .. } => {
                v["file"] = serde_json::json!(path.display().to_string());
            }
            RegionError::MalformedInput { .. } | RegionError::Config(_) => {}
        }
        v
    }
}
