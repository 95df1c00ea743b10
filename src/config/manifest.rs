//! Manifest loading: platforms and plugins declared in `package.json`.
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::ManifestError;
use crate::operations::FileSystemOps;

/// Key of the object holding `platforms` and `plugins` in a `package.json`.
pub const SECTION: &str = "cordova";

/// A plugin and its install-time variables, in declared order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugin {
    /// Plugin identifier passed to the tool.
    pub name: String,
    /// `--variable` pairs.
    pub variables: Vec<Variable>,
}

/// One `--variable KEY=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Variable name.
    pub key: String,
    /// Variable value rendered as a string.
    pub value: String,
}

/// The loaded manifest.
///
/// `document` is the whole parsed file, kept so the recovery snapshot is an
/// exact copy; `platforms` and `plugins` are the typed view used to build
/// the step plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    /// Entire parsed document.
    pub document: Value,
    /// Platform names in declared order.
    pub platforms: Vec<String>,
    /// Plugins in declared order.
    pub plugins: Vec<Plugin>,
}

/// Read and parse the manifest at `path`.
///
/// # Errors
///
/// Returns [`ManifestError`] if the file is missing, unreadable, not JSON, or
/// lacks `platforms`/`plugins`.
pub fn load(path: &Path, fs: &dyn FileSystemOps) -> Result<Manifest, ManifestError> {
    let content = fs.read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &content)
}

/// Parse manifest `content`; `path` is only used in error messages.
///
/// Platforms and plugins are read from the [`SECTION`] object when the
/// document has one, otherwise from the document root.
///
/// # Errors
///
/// Returns [`ManifestError`] on invalid JSON or a missing/misshapen field.
pub fn parse(path: &Path, content: &str) -> Result<Manifest, ManifestError> {
    // Editors on Windows often save package.json with a byte order mark.
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let document: Value = serde_json::from_str(content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let root = document.as_object().ok_or_else(|| ManifestError::InvalidField {
        path: path.to_path_buf(),
        field: "<root>".to_string(),
        message: "expected a JSON object".to_string(),
    })?;

    let (section, prefix) = match root.get(SECTION) {
        Some(Value::Object(section)) => (section, format!("{SECTION}.")),
        Some(_) => {
            return Err(ManifestError::InvalidField {
                path: path.to_path_buf(),
                field: SECTION.to_string(),
                message: "expected an object".to_string(),
            });
        }
        None => (root, String::new()),
    };

    let fields = FieldReader {
        path,
        section,
        prefix: &prefix,
    };
    let platforms = fields.platforms()?;
    let plugins = fields.plugins()?;

    Ok(Manifest {
        document,
        platforms,
        plugins,
    })
}

struct FieldReader<'a> {
    path: &'a Path,
    section: &'a Map<String, Value>,
    prefix: &'a str,
}

impl FieldReader<'_> {
    fn field(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    fn invalid(&self, field: String, message: &str) -> ManifestError {
        ManifestError::InvalidField {
            path: self.path.to_path_buf(),
            field,
            message: message.to_string(),
        }
    }

    fn required(&self, name: &str) -> Result<&Value, ManifestError> {
        self.section
            .get(name)
            .ok_or_else(|| ManifestError::MissingField {
                path: self.path.to_path_buf(),
                field: self.field(name),
            })
    }

    fn platforms(&self) -> Result<Vec<String>, ManifestError> {
        let Value::Array(items) = self.required("platforms")? else {
            return Err(self.invalid(self.field("platforms"), "expected an array"));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    self.invalid(format!("{}[{i}]", self.field("platforms")), "expected a string")
                })
            })
            .collect()
    }

    fn plugins(&self) -> Result<Vec<Plugin>, ManifestError> {
        let Value::Object(entries) = self.required("plugins")? else {
            return Err(self.invalid(self.field("plugins"), "expected an object"));
        };
        entries
            .iter()
            .map(|(name, vars)| {
                let field = format!("{}.{name}", self.field("plugins"));
                let Value::Object(vars) = vars else {
                    return Err(self.invalid(field, "expected an object of variables"));
                };
                let variables = vars
                    .iter()
                    .map(|(key, value)| {
                        scalar_to_string(value)
                            .map(|value| Variable {
                                key: key.clone(),
                                value,
                            })
                            .ok_or_else(|| {
                                self.invalid(
                                    format!("{field}.{key}"),
                                    "expected a string, number or boolean",
                                )
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Plugin {
                    name: name.clone(),
                    variables,
                })
            })
            .collect()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
