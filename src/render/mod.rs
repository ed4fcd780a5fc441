mod html;
mod markdown;
mod stylesheet;

use std::fmt::Display;

pub use html::HtmlStrategy;
pub use markdown::MarkdownStrategy;
pub use stylesheet::Stylesheet;

use crate::error::PipelineError;
use crate::parse::LinkAddress;
use crate::prelude::*;

/// Which render strategy is active. Persisted as a preference and resolved once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Html,
    Markdown,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Html => "html",
            Mode::Markdown => "markdown",
        }
    }

    /// Strict parse; only the two known values are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "html" => Some(Mode::Html),
            "markdown" => Some(Mode::Markdown),
            _ => None,
        }
    }

    /// Interprets a stored preference. Anything that isn't a known mode resolves to the default.
    pub fn from_preference(value: &str) -> Self {
        Self::parse(value).unwrap_or_else(|| {
            warn!(
                "Stored mode \"{value}\" is not recognized, falling back to \"{}\".",
                Mode::default()
            );
            Mode::default()
        })
    }

    pub fn toggled(self) -> Self {
        match self {
            Mode::Html => Mode::Markdown,
            Mode::Markdown => Mode::Html,
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pairs a URL construction rule with a body-to-markup transformation.
#[derive(Debug)]
pub enum RenderStrategy {
    Html(HtmlStrategy),
    Markdown(MarkdownStrategy),
}

impl RenderStrategy {
    pub fn for_mode(mode: Mode, config: &Config) -> Result<Self> {
        let strategy = match mode {
            Mode::Html => Self::Html(HtmlStrategy::new(config)?),
            Mode::Markdown => Self::Markdown(MarkdownStrategy::new(config)?),
        };

        debug!("Using {mode} render strategy.");
        Ok(strategy)
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::Html(_) => Mode::Html,
            Self::Markdown(_) => Mode::Markdown,
        }
    }

    /// Where to fetch the content for `link` from. `None` means this strategy skips the link.
    pub fn url_for(&self, link: &LinkAddress) -> Option<String> {
        match self {
            Self::Html(strategy) => strategy.url_for(link),
            Self::Markdown(strategy) => Some(strategy.url_for(link)),
        }
    }

    pub fn render(&self, body: &str) -> Result<String, PipelineError> {
        match self {
            Self::Html(strategy) => strategy.render(body),
            Self::Markdown(strategy) => Ok(strategy.render(body)),
        }
    }

    /// Markup appended to the page's `<head>`, once per page.
    pub fn stylesheet(&self) -> &Stylesheet {
        match self {
            Self::Html(strategy) => &strategy.stylesheet,
            Self::Markdown(strategy) => &strategy.stylesheet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_values() {
        assert_eq!(Mode::from_preference("html"), Mode::Html);
        assert_eq!(Mode::from_preference("markdown"), Mode::Markdown);
    }

    #[test]
    fn unrecognized_preference_is_default() {
        assert_eq!(Mode::from_preference("Markdown"), Mode::Html);
        assert_eq!(Mode::from_preference(""), Mode::Html);
        assert_eq!(Mode::from_preference("garbage"), Mode::Html);
    }

    #[test]
    fn toggle() {
        assert_eq!(Mode::Html.toggled(), Mode::Markdown);
        assert_eq!(Mode::Markdown.toggled().toggled(), Mode::Markdown);
    }

    #[test]
    fn dispatch() {
        let config = Config::default();
        let link = LinkAddress::parse("wiki-gh/a/b/master", "wiki-gh").unwrap();

        let html = RenderStrategy::for_mode(Mode::Html, &config).unwrap();
        let markdown = RenderStrategy::for_mode(Mode::Markdown, &config).unwrap();

        assert_eq!(html.mode(), Mode::Html);
        assert_eq!(html.url_for(&link), None);
        assert_eq!(
            markdown.url_for(&link).as_deref(),
            Some("https://raw.githubusercontent.com/master/a/b/Home.md")
        );
    }
}
