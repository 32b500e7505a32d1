//! Document loading
//!
//! Implements the load pipeline:
//! 1. Resolve the override source into a base mapping
//! 2. Parse the primary document
//! 3. Merge primary over base (primary wins)
//! 4. Convert path-prefixed keys declared in `[tomlconfig] path_prefix`

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::convert::{convert_in, to_path};
use super::lookup::deep_get;
use super::merge::{deep_merge, merge_layers};
use super::{CONTROL_SECTION, PATH_PREFIX_KEY};
use crate::error::{ConfigError, Result};
use crate::value::{from_toml_table, ConfigMapping, ConfigValue};

/// Low-precedence source merged underneath the primary document
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Override {
    /// Start from an empty mapping
    #[default]
    None,
    /// Load this document (with no override of its own) as the base
    Path(PathBuf),
    /// Use this mapping as the base; it is merged into and handed back
    Mapping(ConfigMapping),
}

impl Override {
    /// Reject shapes that cannot be loaded, before touching the filesystem
    fn validate(&self) -> Result<()> {
        match self {
            Self::Path(path) => validate_path(path).map(|_| ()),
            Self::None | Self::Mapping(_) => Ok(()),
        }
    }

    fn resolve(self) -> Result<ConfigMapping> {
        match self {
            Self::None => Ok(ConfigMapping::new()),
            Self::Path(path) => {
                debug!(path = %path.display(), "loading override document");
                load(&path, Override::None)
            }
            Self::Mapping(mapping) => Ok(mapping),
        }
    }
}

impl From<&str> for Override {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<String> for Override {
    fn from(path: String) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<&Path> for Override {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for Override {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<ConfigMapping> for Override {
    fn from(mapping: ConfigMapping) -> Self {
        Self::Mapping(mapping)
    }
}

impl<T: Into<Override>> From<Option<T>> for Override {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Accepts a value taken from another configuration: a string or path names
/// a document, a table is used directly, null means no override.
impl TryFrom<ConfigValue> for Override {
    type Error = ConfigError;

    fn try_from(value: ConfigValue) -> Result<Self> {
        match value {
            ConfigValue::String(s) => Ok(Self::Path(PathBuf::from(s))),
            ConfigValue::Path(p) => Ok(Self::Path(p)),
            ConfigValue::Table(mapping) => Ok(Self::Mapping(mapping)),
            ConfigValue::Null => Ok(Self::None),
            other => Err(ConfigError::InvalidArgument(format!(
                "override must be a path, a table or null, found {}",
                other.type_name()
            ))),
        }
    }
}

/// Load `config_path` merged over `to_override`.
///
/// Values from the document at `config_path` take precedence over the
/// override. When the merged result declares `[tomlconfig] path_prefix`,
/// every matching key outside the control section becomes a path value.
pub fn load(
    config_path: impl AsRef<Path>,
    to_override: impl Into<Override>,
) -> Result<ConfigMapping> {
    let config_path = validate_path(config_path.as_ref())?;
    let to_override = to_override.into();
    to_override.validate()?;

    let mut config = to_override.resolve()?;
    merge_document(&mut config, config_path)?;
    Ok(config)
}

/// Load `config_path` into a caller-owned mapping, mutating it in place
pub fn load_into<'a>(
    base: &'a mut ConfigMapping,
    config_path: impl AsRef<Path>,
) -> Result<&'a mut ConfigMapping> {
    let config_path = validate_path(config_path.as_ref())?;
    merge_document(base, config_path)?;
    Ok(base)
}

/// Same pipeline as [`load`] for a document held in memory
pub fn load_str(contents: &str, to_override: impl Into<Override>) -> Result<ConfigMapping> {
    let to_override = to_override.into();
    to_override.validate()?;

    let mut config = to_override.resolve()?;
    let document = parse_document(contents, None)?;
    deep_merge(&mut config, &document);
    apply_path_prefixes(&mut config)?;
    Ok(config)
}

/// Load several documents in order (first is base, last has highest
/// precedence). Path prefixes are applied once, to the merged result.
pub fn load_layers<P>(paths: impl IntoIterator<Item = P>) -> Result<ConfigMapping>
where
    P: AsRef<Path>,
{
    let paths: Vec<P> = paths.into_iter().collect();
    if paths.is_empty() {
        return Err(ConfigError::InvalidArgument(
            "at least one config path is required".to_string(),
        ));
    }
    for path in &paths {
        validate_path(path.as_ref())?;
    }

    let layers = paths
        .iter()
        .map(|path| read_document(path.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    let mut config = merge_layers(layers);
    apply_path_prefixes(&mut config)?;
    Ok(config)
}

fn validate_path(path: &Path) -> Result<&Path> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::InvalidArgument(
            "config path must not be empty".to_string(),
        ));
    }
    Ok(path)
}

fn merge_document(config: &mut ConfigMapping, path: &Path) -> Result<()> {
    let document = read_document(path)?;
    deep_merge(config, &document);
    apply_path_prefixes(config)
}

/// Read and parse a TOML file
fn read_document(path: &Path) -> Result<ConfigMapping> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_document(&contents, Some(path))?;
    debug!(path = %path.display(), keys = document.len(), "loaded config document");
    Ok(document)
}

fn parse_document(contents: &str, path: Option<&Path>) -> Result<ConfigMapping> {
    let table: toml::Table = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.map(Path::to_path_buf),
        source,
    })?;
    Ok(from_toml_table(table))
}

/// Run one path conversion pass per prefix declared in the control section.
/// A missing control section or prefix list means nothing to do.
fn apply_path_prefixes(config: &mut ConfigMapping) -> Result<()> {
    let control_key = format!("{}.{}", CONTROL_SECTION, PATH_PREFIX_KEY);
    let prefixes = match deep_get(config, &control_key) {
        Some(value) => declared_prefixes(value)?,
        None => return Ok(()),
    };

    for prefix in &prefixes {
        let converted = convert_in(config, prefix, &to_path)?;
        debug!(prefix = %prefix, converted, "applied path prefix");
    }
    Ok(())
}

fn declared_prefixes(value: &ConfigValue) -> Result<Vec<String>> {
    match value {
        ConfigValue::Array(items) => items
            .iter()
            .map(|item| match item {
                ConfigValue::String(s) => Ok(s.clone()),
                other => Err(ConfigError::InvalidControl(format!(
                    "{} entries must be strings, found {}",
                    PATH_PREFIX_KEY,
                    other.type_name()
                ))),
            })
            .collect(),
        ConfigValue::String(s) => {
            warn!(
                prefix = %s,
                "{} is a single string, treating it as a one-element list",
                PATH_PREFIX_KEY
            );
            Ok(vec![s.clone()])
        }
        other => Err(ConfigError::InvalidControl(format!(
            "{} must be a list of strings, found {}",
            PATH_PREFIX_KEY,
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigQuery;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_doc(contents: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, "{}", contents).unwrap();
        temp
    }

    #[test]
    fn test_load_without_override() {
        let temp = write_doc("name = \"svc\"\n[server]\nport = 8080\n");

        let config = load(temp.path(), Override::None).unwrap();

        assert_eq!(config.get_str("name"), Some("svc"));
        assert_eq!(config.get_i64("server.port"), Some(8080));
    }

    #[test]
    fn test_primary_wins_over_mapping_override() {
        let temp = write_doc("name = \"primary\"\n");
        let mut base = ConfigMapping::new();
        base.insert("name".to_string(), ConfigValue::from("base"));
        base.insert("count".to_string(), ConfigValue::Integer(1));

        let config = load(temp.path(), base).unwrap();

        assert_eq!(config.get_str("name"), Some("primary"));
        assert_eq!(config.get_i64("count"), Some(1));
        assert_eq!(config.len(), 2);
    }

    #[test]
    fn test_override_by_path() {
        let defaults = write_doc("level = \"info\"\n[db]\nhost = \"localhost\"\nport = 5432\n");
        let site = write_doc("[db]\nhost = \"db.internal\"\n");

        let config = load(site.path(), defaults.path()).unwrap();

        assert_eq!(config.get_str("level"), Some("info"));
        assert_eq!(config.get_str("db.host"), Some("db.internal"));
        assert_eq!(config.get_i64("db.port"), Some(5432));
    }

    #[test]
    fn test_load_into_mutates_in_place() {
        let temp = write_doc("added = true\n");
        let mut base = ConfigMapping::new();
        base.insert("kept".to_string(), ConfigValue::Integer(7));
        let ptr: *const ConfigMapping = &base;

        let returned = load_into(&mut base, temp.path()).unwrap();
        assert!(std::ptr::eq(&*returned, ptr));

        assert_eq!(base.get_bool("added"), Some(true));
        assert_eq!(base.get_i64("kept"), Some(7));
    }

    #[test]
    fn test_path_prefix_applied() {
        let temp = write_doc(
            r#"
            path_data = "/srv/data"
            name = "svc"

            [tomlconfig]
            path_prefix = ["path_"]

            [logs]
            path_dir = "/var/log/svc"
            "#,
        );

        let config = load(temp.path(), Override::None).unwrap();

        assert_eq!(
            config.lookup("path_data"),
            Some(&ConfigValue::Path(PathBuf::from("/srv/data")))
        );
        assert_eq!(
            config.lookup("logs.path_dir"),
            Some(&ConfigValue::Path(PathBuf::from("/var/log/svc")))
        );
        assert_eq!(config.get_str("name"), Some("svc"));
        assert_eq!(
            config.lookup("tomlconfig.path_prefix"),
            Some(&ConfigValue::Array(vec![ConfigValue::from("path_")]))
        );
    }

    #[test]
    fn test_prefix_declared_in_override_applies_to_primary() {
        let defaults = write_doc("[tomlconfig]\npath_prefix = [\"dir_\"]\n");
        let primary = write_doc("dir_cache = \"cache\"\n");

        let config = load(primary.path(), defaults.path()).unwrap();

        assert_eq!(
            config.lookup("dir_cache"),
            Some(&ConfigValue::Path(PathBuf::from("cache")))
        );
    }

    #[test]
    fn test_no_control_section_leaves_strings() {
        let temp = write_doc("path_data = \"/srv/data\"\n");
        let config = load(temp.path(), Override::None).unwrap();
        assert_eq!(config.lookup("path_data"), Some(&ConfigValue::from("/srv/data")));
    }

    #[test]
    fn test_control_section_without_prefix_list() {
        let config = load_str("[tomlconfig]\nother = 1\np = \"x\"\n", Override::None).unwrap();
        assert_eq!(config.get_str("tomlconfig.p"), Some("x"));
    }

    #[test]
    fn test_single_string_prefix() {
        let config = load_str(
            "p_x = \"a\"\n[tomlconfig]\npath_prefix = \"p_\"\n",
            Override::None,
        )
        .unwrap();
        assert_eq!(
            config.lookup("p_x"),
            Some(&ConfigValue::Path(PathBuf::from("a")))
        );
    }

    #[test]
    fn test_invalid_prefix_list() {
        let err = load_str("[tomlconfig]\npath_prefix = [\"p_\", 3]\n", Override::None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidControl(_)));

        let err = load_str("[tomlconfig]\npath_prefix = 3\n", Override::None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidControl(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        let err = load(&missing, Override::None).unwrap_err();

        match err {
            ConfigError::Io { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let temp = write_doc("this is = = not toml\n");

        let err = load(temp.path(), Override::None).unwrap_err();

        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path.as_deref(), Some(temp.path())),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_paths_rejected_before_io() {
        let err = load("", Override::None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument(_)));

        // The primary does not exist; the override shape is checked first
        let err = load("/nonexistent/primary.toml", "").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument(_)));
    }

    #[test]
    fn test_override_from_config_value() {
        let mut table = ConfigMapping::new();
        table.insert("a".to_string(), ConfigValue::Integer(1));

        assert_eq!(
            Override::try_from(ConfigValue::Table(table.clone())).unwrap(),
            Override::Mapping(table)
        );
        assert_eq!(
            Override::try_from(ConfigValue::from("base.toml")).unwrap(),
            Override::Path(PathBuf::from("base.toml"))
        );
        assert_eq!(Override::try_from(ConfigValue::Null).unwrap(), Override::None);
        assert!(matches!(
            Override::try_from(ConfigValue::Integer(3)),
            Err(ConfigError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_override_from_option() {
        assert_eq!(Override::from(None::<PathBuf>), Override::None);
        assert_eq!(
            Override::from(Some("a.toml")),
            Override::Path(PathBuf::from("a.toml"))
        );
    }

    #[test]
    fn test_load_layers() {
        let builtin = write_doc("timeout = 100\n[cache]\nmode = \"off\"\n");
        let host = write_doc("timeout = 200\n[tomlconfig]\npath_prefix = [\"root\"]\n");
        let repo = write_doc("root = \"/repo\"\n[cache]\nmode = \"on\"\n");

        let config = load_layers([builtin.path(), host.path(), repo.path()]).unwrap();

        assert_eq!(config.get_i64("timeout"), Some(200));
        assert_eq!(config.get_str("cache.mode"), Some("on"));
        assert_eq!(
            config.lookup("root"),
            Some(&ConfigValue::Path(PathBuf::from("/repo")))
        );
    }

    #[test]
    fn test_load_layers_requires_a_path() {
        let err = load_layers(Vec::<PathBuf>::new()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidArgument(_)));
    }

    #[test]
    fn test_load_str_parse_error_has_no_path() {
        let err = load_str("[unterminated", Override::None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    }
}
