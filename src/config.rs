use crate::api::DEFAULT_ADDRESS;
use crate::error::CommandError;
use anyhow::{anyhow, Context, Result};
use fs_err as fs;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const TOKEN_ENV: &str = "TFE_TOKEN";
pub const ORG_ENV: &str = "TFE_ORG";
pub const ADDRESS_ENV: &str = "TFE_ADDRESS";

/// Contents of the optional `config.toml`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(path)?;
        let cfg = toml::from_str(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(Some(cfg))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tfvar").join("config.toml"))
}

/// An explicitly named file must exist; the default one is optional.
pub fn load(explicit: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = explicit {
        return FileConfig::load(path)?
            .ok_or_else(|| anyhow!("config file {} not found", path.display()));
    }
    let Some(path) = default_config_path() else {
        return Ok(FileConfig::default());
    };
    Ok(FileConfig::load(&path)?.unwrap_or_default())
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides<'a> {
    pub token: Option<&'a str>,
    pub organization: Option<&'a str>,
    pub address: Option<&'a str>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub token: String,
    pub organization: String,
    pub address: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("token", &"<redacted>")
            .field("organization", &self.organization)
            .field("address", &self.address)
            .finish()
    }
}

/// Resolves token, organization and address: flag, then environment, then file.
/// Empty strings count as unset at every layer.
pub fn resolve(
    flags: Overrides<'_>,
    file: &FileConfig,
    lookup_env: &dyn Fn(&str) -> Option<String>,
) -> Result<Settings, CommandError> {
    let pick = |flag: Option<&str>, env: &str, from_file: &Option<String>| -> Option<String> {
        flag.map(str::to_string)
            .filter(|s| !s.is_empty())
            .or_else(|| lookup_env(env).filter(|s| !s.is_empty()))
            .or_else(|| from_file.clone().filter(|s| !s.is_empty()))
    };
    let token = pick(flags.token, TOKEN_ENV, &file.token).ok_or_else(|| {
        CommandError::invalid_args(format!("--token argument is required (or set {TOKEN_ENV})"))
    })?;
    let organization = pick(flags.organization, ORG_ENV, &file.organization).ok_or_else(|| {
        CommandError::invalid_args(format!("--org argument is required (or set {ORG_ENV})"))
    })?;
    let address = pick(flags.address, ADDRESS_ENV, &file.address)
        .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
    Ok(Settings {
        token,
        organization,
        address,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn flags_beat_env_beat_file() {
        let file = FileConfig {
            token: Some("file-token".into()),
            organization: Some("file-org".into()),
            address: Some("https://file.example.com".into()),
        };
        let env = env_of(&[(TOKEN_ENV, "env-token"), (ORG_ENV, "env-org")]);
        let flags = Overrides {
            token: Some("flag-token"),
            ..Default::default()
        };
        let s = resolve(flags, &file, &env).unwrap();
        assert_eq!(s.token, "flag-token");
        assert_eq!(s.organization, "env-org");
        assert_eq!(s.address, "https://file.example.com");
    }

    #[test]
    fn empty_values_fall_through() {
        let env = env_of(&[(TOKEN_ENV, ""), (ORG_ENV, "acme")]);
        let file = FileConfig {
            token: Some("file-token".into()),
            ..Default::default()
        };
        let flags = Overrides {
            token: Some(""),
            ..Default::default()
        };
        let s = resolve(flags, &file, &env).unwrap();
        assert_eq!(s.token, "file-token");
        assert_eq!(s.address, DEFAULT_ADDRESS);
    }

    #[test]
    fn token_is_checked_before_organization() {
        let err = resolve(Overrides::default(), &FileConfig::default(), &env_of(&[])).unwrap_err();
        assert_eq!(err.code(), "INVALID_ARGS");
        assert!(err.to_string().starts_with("--token argument is required"));

        let env = env_of(&[(TOKEN_ENV, "t")]);
        let err = resolve(Overrides::default(), &FileConfig::default(), &env).unwrap_err();
        assert!(err.to_string().starts_with("--org argument is required"));
    }

    #[test]
    fn debug_output_hides_token() {
        let env = env_of(&[(TOKEN_ENV, "super-secret"), (ORG_ENV, "acme")]);
        let s = resolve(Overrides::default(), &FileConfig::default(), &env).unwrap();
        let dbg = format!("{s:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("acme"));
    }

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "token = \"abc\"\norganization = \"acme\"\n").unwrap();
        let cfg = load(Some(path.as_path())).unwrap();
        assert_eq!(cfg.token.as_deref(), Some("abc"));
        assert_eq!(cfg.organization.as_deref(), Some("acme"));
        assert_eq!(cfg.address, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tokne = \"abc\"\n").unwrap();
        let err = load(Some(path.as_path())).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(load(Some(path.as_path())).is_err());
        assert_eq!(FileConfig::load(&path).unwrap(), None);
    }
}
