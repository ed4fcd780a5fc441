use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Represents the contents of `wiki-gh.toml`.
///
/// Every section is optional; a missing file or section falls back to the defaults,
/// which point at GitHub and match the markup GitHub serves for its wiki pages.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub links: Links,
    pub source: Source,
    pub fetch: Fetch,
    pub render: Render,
    pub store: Store,
    /// Directory of the file this configuration was loaded from, if any.
    #[serde(skip)]
    pub root: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Links {
    pub prefix: String,
}

impl Default for Links {
    fn default() -> Self {
        Links {
            prefix: DEFAULT_LINK_PREFIX.to_owned(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Source {
    /// Host serving rendered wiki pages.
    pub host: String,
    /// Host serving raw repository content.
    pub raw_host: String,
}

impl Default for Source {
    fn default() -> Self {
        Source {
            host: "https://github.com".to_owned(),
            raw_host: "https://raw.githubusercontent.com".to_owned(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Fetch {
    pub user_agent: String,
    pub accept: String,
    pub timeout_secs: u64,
}

impl Default for Fetch {
    fn default() -> Self {
        Fetch {
            user_agent: "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/537.36".to_owned(),
            accept: "text/html".to_owned(),
            timeout_secs: 30,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Render {
    /// `id` of the element wrapping a wiki page's content.
    pub wrapper_id: String,
    /// `id` of the sidebar removed from inside the wrapper.
    pub sidebar_id: String,
    /// External stylesheet attached once per page in HTML mode.
    pub stylesheet_url: Option<String>,
    /// Expand GitHub `:shortcode:` emoji when rendering Markdown.
    pub emoji: bool,
}

impl Default for Render {
    fn default() -> Self {
        Render {
            wrapper_id: "wiki-wrapper".to_owned(),
            sidebar_id: "wiki-rightbar".to_owned(),
            stylesheet_url: Some(
                "https://raw.githubusercontent.com/knsys/GHWSGI/master/ghwsgi.min.css".to_owned(),
            ),
            emoji: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Store {
    pub path: PathBuf,
    pub namespace: String,
}

impl Default for Store {
    fn default() -> Self {
        Store {
            path: PathBuf::from(PREFERENCE_STORE_PATH),
            namespace: DEFAULT_NAMESPACE.to_owned(),
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self> {
        let toml_raw = match path.exists() {
            true => {
                std::fs::read_to_string(path)
                    .wrap_err("Could not read in configuration file.")
                    .suggestion("The configuration file was found, but couldn't be read - try checking your file permissions.")?
            },
            false => bail!("Configuration file not found.")
        };

        let mut config: Self = toml::from_str(&toml_raw)
            .wrap_err_with(|| format!("Could not parse configuration file {path:?}."))?;

        config.root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf);

        Ok(config)
    }

    /// Where the preference store lives. Relative paths are anchored to the configuration
    /// file's directory, so every subdirectory of a project shares one store.
    pub fn store_path(&self) -> PathBuf {
        match &self.root {
            Some(root) if self.store.path.is_relative() => root.join(&self.store.path),
            _ => self.store.path.clone(),
        }
    }

    /// Loads the configuration at `path` if one was given, otherwise the nearest `wiki-gh.toml`
    /// at or above `start`. With neither available, the defaults are used.
    pub fn locate(path: Option<&Path>, start: &Path) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_path(path);
        }

        match try_locate_config(start) {
            Some(path) => {
                debug!("Using configuration at {path:?}.");
                Self::from_path(&path)
            }
            None => {
                debug!("No configuration file found, using defaults.");
                Ok(Self::default())
            }
        }
    }
}

fn try_locate_config(start: &Path) -> Option<PathBuf> {
    let mut path: PathBuf = start.into();
    let target = Path::new(CONFIG_FILENAME);

    loop {
        path.push(target);

        if path.is_file() {
            break Some(path);
        }

        if !(path.pop() && path.pop()) {
            break None;
        }
    }
}
