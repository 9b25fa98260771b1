use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level project configuration loaded from `.apigen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApigenConfig {
    pub input: String,
    pub output: String,
    /// Import specifier of the runtime library the generated module calls into.
    pub runtime_module: String,
    /// The input document was upgraded from Swagger 2.0 before generation.
    pub upgraded: bool,
    pub options: GenerateOptions,
}

impl Default for ApigenConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: "src/api.ts".to_string(),
            runtime_module: DEFAULT_RUNTIME_MODULE.to_string(),
            upgraded: false,
            options: GenerateOptions::default(),
        }
    }
}

/// Options that change what the generator emits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Only emit operations carrying at least one of these tags.
    pub include: Option<Vec<String>>,
    /// Never emit operations carrying any of these tags.
    pub exclude: Vec<String>,
    /// Emit named `enum` declarations instead of literal unions.
    #[serde(alias = "useEnumType")]
    pub use_enum_type: bool,
    /// Keep a single type per schema instead of Base/Read/Write variants.
    #[serde(alias = "mergeReadWriteOnly")]
    pub merge_read_write_only: bool,
    /// Union optional properties with `undefined`.
    #[serde(alias = "unionUndefined")]
    pub union_undefined: bool,
    /// Wrap every call in the runtime's `ok` adapter.
    pub optimistic: bool,
}

impl GenerateOptions {
    /// Whether tag filtering drops an operation with the given tags.
    pub fn skips(&self, tags: &[String]) -> bool {
        if tags.iter().any(|t| self.exclude.contains(t)) {
            return true;
        }
        match &self.include {
            Some(include) => !tags.iter().any(|t| include.contains(t)),
            None => false,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".apigen.yaml";

/// Runtime library imported by generated modules unless configured otherwise.
pub const DEFAULT_RUNTIME_MODULE: &str = "@apigen/runtime";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<ApigenConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: ApigenConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# apigen configuration
input: openapi.yaml
output: src/api.ts
runtime_module: "@apigen/runtime"
upgraded: false       # set when the document was converted from Swagger 2.0

options:
  # include: [pets]   # only emit operations tagged with one of these
  exclude: []         # never emit operations tagged with one of these
  use_enum_type: false
  merge_read_write_only: false
  union_undefined: false
  optimistic: false
"#
}
