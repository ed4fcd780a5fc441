use std::path::PathBuf;

use reqwest::Url;

use crate::fetch::Fetcher;
use crate::prelude::*;

/// Where the host page comes from. Also decides which origin's preferences apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    Remote(Url),
    Local(PathBuf),
}

impl PageSource {
    pub fn parse(source: &str) -> Self {
        match Url::parse(source) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Remote(url),
            _ => Self::Local(PathBuf::from(source)),
        }
    }

    pub fn origin(&self) -> String {
        match self {
            Self::Remote(url) => url.origin().ascii_serialization(),
            Self::Local(_) => FILE_ORIGIN.to_owned(),
        }
    }

    pub async fn load(&self, fetcher: &impl Fetcher) -> Result<String> {
        match self {
            Self::Remote(url) => fetcher
                .get(url.as_str())
                .await
                .wrap_err("Could not fetch the page to augment."),
            Self::Local(path) => tokio::fs::read_to_string(path)
                .await
                .wrap_err_with(|| format!("Could not read {path:?}."))
                .suggestion("The page must be an existing file or an http(s) URL."),
        }
    }
}
