//! Custom figment providers.

use figment::{
    Error, Metadata, Profile, Provider,
    providers::{Env, Format, Toml},
    value::{Dict, Map, Value},
};
use std::path::{Path, PathBuf};

/// Reads a toml file whose profiles live under `[profile.<name>]` tables.
///
/// Returns an error if the env var is set but the file does not exist. A missing default file
/// yields no data.
pub(crate) struct TomlFileProvider {
    pub env_var: Option<&'static str>,
    pub default: PathBuf,
    pub section: &'static str,
}

impl TomlFileProvider {
    pub(crate) fn new(
        env_var: Option<&'static str>,
        default: impl Into<PathBuf>,
        section: &'static str,
    ) -> Self {
        Self { env_var, default: default.into(), section }
    }

    fn env_val(&self) -> Option<String> {
        self.env_var.and_then(Env::var)
    }

    fn file(&self) -> PathBuf {
        self.env_val().map(PathBuf::from).unwrap_or_else(|| self.default.clone())
    }

    fn read(&self) -> Result<Map<Profile, Dict>, Error> {
        use serde::de::Error as _;
        if let Some(file) = self.env_val() {
            let path = Path::new(&file);
            if !path.exists() {
                return Err(Error::custom(format!(
                    "Config file `{file}` set in env var `{}` does not exist",
                    self.env_var.unwrap_or_default()
                )));
            }
        }

        let mut root = Toml::file(self.file()).data()?.remove(&Profile::Default).unwrap_or_default();
        let mut profiles = Map::new();
        if let Some(section) = root.remove(self.section) {
            let Some(section) = section.into_dict() else {
                return Err(Error::custom(format!("`{}` must be a table", self.section)));
            };
            for (name, value) in section {
                let Value::Dict(_, dict) = value else {
                    return Err(Error::custom(format!(
                        "`[{}.{name}]` must be a table",
                        self.section
                    )));
                };
                profiles.insert(Profile::new(&name), dict);
            }
        }
        for key in root.keys() {
            warn!(target: "missive::config", %key, file = %self.file().display(), "ignoring key outside of a profile section");
        }
        Ok(profiles)
    }
}

impl Provider for TomlFileProvider {
    fn metadata(&self) -> Metadata {
        Metadata::named(format!("TOML file `{}`", self.file().display()))
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        self.read()
    }
}
