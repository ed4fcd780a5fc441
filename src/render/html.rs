use std::cell::Cell;

use lol_html::html_content::ContentType;
use lol_html::{element, HtmlRewriter, Selector, Settings};

use super::Stylesheet;
use crate::error::PipelineError;
use crate::parse::LinkAddress;
use crate::prelude::*;

/// Markers bracketing the wrapper's contents in the rewritten output, so it can be sliced back out.
const BEGIN_MARKER: &str = "<!--wiki-gh:begin-->";
const END_MARKER: &str = "<!--wiki-gh:end-->";

/// Scrapes the rendered wiki page served by the source host.
#[derive(Debug)]
pub struct HtmlStrategy {
    host: String,
    wrapper: String,
    sidebar: String,
    pub(super) stylesheet: Stylesheet,
}

impl HtmlStrategy {
    pub fn new(config: &Config) -> Result<Self> {
        let wrapper = format!("#{}", config.render.wrapper_id);
        let sidebar = format!("#{}", config.render.sidebar_id);

        // element! unwraps selector parsing, so bad IDs have to be caught here instead.
        for selector in [&wrapper, &sidebar] {
            selector
                .parse::<Selector>()
                .map_err(|err| eyre!("{err}"))
                .wrap_err_with(|| format!("\"{selector}\" is not a usable selector."))
                .suggestion("Check `wrapper_id` and `sidebar_id` in the [render] section of your configuration.")?;
        }

        Ok(Self {
            host: config.source.host.trim_end_matches('/').to_owned(),
            wrapper,
            sidebar,
            stylesheet: Stylesheet::new(config.render.stylesheet_url.clone())?,
        })
    }

    /// Only wiki links have a rendered page to scrape.
    pub fn url_for(&self, link: &LinkAddress) -> Option<String> {
        if link.content_type != "wiki" {
            return None;
        }

        Some(format!(
            "{}/{}/{}/wiki/{}",
            self.host, link.owner, link.repository, link.page_path
        ))
    }

    /// Extracts the inner markup of the wiki wrapper element, with the sidebar removed
    /// and every root-relative link made absolute and opening in a new tab.
    pub fn render(&self, body: &str) -> Result<String, PipelineError> {
        let host = self.host.as_str();
        let marked = Cell::new(false);
        let mut output = vec![];
        {
            let mut rewriter = HtmlRewriter::new(
                Settings {
                    element_content_handlers: vec![
                        // Only the first wrapper counts if the ID is repeated.
                        element!(self.wrapper, |el| {
                            if !marked.replace(true) {
                                el.prepend(BEGIN_MARKER, ContentType::Html);
                                el.append(END_MARKER, ContentType::Html);
                            }
                            Ok(())
                        }),
                        element!(self.sidebar, |el| {
                            el.remove();
                            Ok(())
                        }),
                        element!(r#"a[href^="/"]"#, |el| {
                            let Some(href) = el.get_attribute("href") else {
                                return Ok(());
                            };

                            // Protocol-relative, not root-relative.
                            if href.starts_with("//") {
                                return Ok(());
                            }

                            el.set_attribute("href", &format!("{host}{href}"))?;
                            el.set_attribute("target", "_blank")?;
                            el.set_attribute("rel", "noopener")?;
                            Ok(())
                        }),
                    ],
                    ..Settings::default()
                },
                |c: &[u8]| output.extend_from_slice(c),
            );
            rewriter.write(body.as_bytes()).map_err(PipelineError::render)?;
            rewriter.end().map_err(PipelineError::render)?;
        }
        let hypertext = String::from_utf8(output).map_err(PipelineError::render)?;

        let Some(start) = hypertext.find(BEGIN_MARKER) else {
            return Err(PipelineError::render(format!(
                "no element matching \"{}\" in response body",
                self.wrapper
            )));
        };
        let start = start + BEGIN_MARKER.len();

        let Some(end) = hypertext[start..].find(END_MARKER) else {
            return Err(PipelineError::render(format!(
                "element matching \"{}\" is never closed",
                self.wrapper
            )));
        };

        Ok(hypertext[start..start + end].to_owned())
    }
}
