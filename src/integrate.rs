//! Finds prefixed links in a page and swaps each one for the content it points at.
//!
//! Every link runs its own pipeline:
//! 1. *Pending*: the href is parsed into a [`LinkAddress`] and the active strategy is asked for a URL.
//!    No URL means the strategy doesn't handle this kind of link, and the link is skipped.
//! 2. *Fetched*: the URL is retrieved through the [`Fetcher`].
//! 3. *Mounted*: the body is rendered and wrapped in a content block that replaces the link.
//!
//! Pipelines run concurrently and independently. A failure in one is logged and leaves
//! that link exactly as it was; it never affects the others.

use std::cell::Cell;

use futures_util::future::join_all;
use lol_html::html_content::ContentType;
use lol_html::{element, HtmlRewriter, Selector, Settings};

use crate::error::PipelineError;
use crate::fetch::Fetcher;
use crate::parse::LinkAddress;
use crate::prelude::*;
use crate::render::{Mode, RenderStrategy};
use crate::store::{self, PreferenceStore};

/// What happened to a single link.
#[derive(Debug)]
pub enum LinkOutcome {
    /// The link was replaced with this content block.
    Mounted(String),
    /// The active strategy doesn't handle this link.
    Skipped(PipelineError),
    Failed(PipelineError),
}

impl LinkOutcome {
    pub fn is_mounted(&self) -> bool {
        matches!(self, Self::Mounted(_))
    }
}

/// An augmented page, plus the outcome of every link found in it (in document order).
#[derive(Debug)]
pub struct Augmented {
    pub html: String,
    pub outcomes: Vec<(String, LinkOutcome)>,
}

impl Augmented {
    pub fn mounted(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_mounted()).count()
    }
}

pub struct Integrator<F: Fetcher> {
    strategy: RenderStrategy,
    fetcher: F,
    prefix: String,
}

impl<F: Fetcher> Integrator<F> {
    pub fn new(strategy: RenderStrategy, fetcher: F, config: &Config) -> Result<Self> {
        let integrator = Self {
            strategy,
            fetcher,
            prefix: config.links.prefix.clone(),
        };

        integrator
            .selector()
            .parse::<Selector>()
            .map_err(|err| eyre!("{err}"))
            .wrap_err_with(|| format!("Link prefix \"{}\" cannot be matched.", integrator.prefix))
            .suggestion("Check `prefix` in the [links] section of your configuration.")?;

        Ok(integrator)
    }

    fn selector(&self) -> String {
        format!(r#"a[href^="{}/"]"#, self.prefix)
    }

    /// Returns the href of every prefixed link in `page`, in document order.
    /// Character references are decoded, so `Q&amp;A` comes back as `Q&A`.
    pub fn discover(&self, page: &str) -> Result<Vec<String>> {
        let mut hrefs = vec![];
        let mut output = vec![];
        {
            let mut rewriter = HtmlRewriter::new(
                Settings {
                    element_content_handlers: vec![element!(self.selector(), |el| {
                        if let Some(href) = el.get_attribute("href") {
                            hrefs.push(html_escape::decode_html_entities(&href).into_owned());
                        }
                        Ok(())
                    })],
                    ..Settings::default()
                },
                |c: &[u8]| output.extend_from_slice(c),
            );
            rewriter.write(page.as_bytes())?;
            rewriter.end()?;
        }

        debug!("Discovered {} link(s).", hrefs.len());
        Ok(hrefs)
    }

    /// Runs the full pipeline for one link.
    pub async fn run_pipeline(&self, href: &str) -> LinkOutcome {
        match self.try_pipeline(href).await {
            Ok(block) => {
                info!("Mounted {href}.");
                LinkOutcome::Mounted(block)
            }
            Err(err @ PipelineError::UnsupportedContentType(_)) => {
                debug!("Skipping {href}: {err}");
                LinkOutcome::Skipped(err)
            }
            Err(err) => {
                warn!("Leaving {href} unchanged: {err}");
                LinkOutcome::Failed(err)
            }
        }
    }

    async fn try_pipeline(&self, href: &str) -> Result<String, PipelineError> {
        let link = LinkAddress::parse(href, &self.prefix)?;

        let url = self
            .strategy
            .url_for(&link)
            .ok_or_else(|| PipelineError::UnsupportedContentType(link.content_type.clone()))?;

        let body = self.fetcher.get(&url).await?;
        let content = self.strategy.render(&body)?;

        Ok(content_block(&content, self.strategy.mode()))
    }

    /// Replaces every prefixed link in `page` whose pipeline succeeds, and injects the
    /// strategy's stylesheet into `<head>` (or the top of the document if there is no `<head>` tag).
    pub async fn augment(&self, page: &str) -> Result<Augmented> {
        let hrefs = self.discover(page)?;

        let outcomes = join_all(hrefs.iter().map(|href| self.run_pipeline(href))).await;
        let outcomes: Vec<(String, LinkOutcome)> = hrefs.into_iter().zip(outcomes).collect();

        let html = self.mount(page, &outcomes)?;
        let augmented = Augmented { html, outcomes };

        info!(
            "Replaced {} of {} link(s).",
            augmented.mounted(),
            augmented.outcomes.len()
        );

        Ok(augmented)
    }

    fn mount(&self, page: &str, outcomes: &[(String, LinkOutcome)]) -> Result<String> {
        let head = self.strategy.stylesheet().to_markup();
        let injected = Cell::new(false);
        let mut blocks = outcomes.iter().map(|(_, outcome)| outcome);
        let mut output = vec![];
        {
            let mut rewriter = HtmlRewriter::new(
                Settings {
                    element_content_handlers: vec![
                        element!("head", |el| {
                            if !injected.replace(true) {
                                el.append(&head, ContentType::Html);
                            }
                            Ok(())
                        }),
                        // Both passes see links in the same order, so outcomes line up one-to-one.
                        element!(self.selector(), |el| {
                            if let Some(LinkOutcome::Mounted(block)) = blocks.next() {
                                el.replace(block, ContentType::Html);
                            }
                            Ok(())
                        }),
                    ],
                    ..Settings::default()
                },
                |c: &[u8]| output.extend_from_slice(c),
            );
            rewriter.write(page.as_bytes())?;
            rewriter.end()?;
        }
        let mut hypertext = String::from_utf8(output)?;

        // `<head>` is optional in HTML and lol_html never synthesizes missing elements.
        if !injected.get() {
            debug!("Page has no <head> tag, injecting styles at the top of the document.");
            hypertext.insert_str(after_doctype(&hypertext), &head);
        }

        Ok(hypertext)
    }
}

/// Byte offset just past a leading `<!DOCTYPE ...>`, or 0 if the document doesn't start with one.
fn after_doctype(document: &str) -> usize {
    let trimmed = document.trim_start();
    let offset = document.len() - trimmed.len();

    let is_doctype = trimmed
        .get(..9)
        .is_some_and(|start| start.eq_ignore_ascii_case("<!doctype"));

    match (is_doctype, trimmed.find('>')) {
        (true, Some(end)) => offset + end + 1,
        _ => 0,
    }
}

/// Builds the block that stands in for a link: a toggle control followed by the rendered content.
pub fn content_block(content: &str, mode: Mode) -> String {
    let other = mode.toggled();

    format!(
        r#"<section class="{CONTENT_BLOCK_CLASS}"><a class="{TOGGLE_CLASS}" {TOGGLE_MODE_ATTRIBUTE}="{other}" title="Run `wikigh mode toggle` to switch to {other} mode">{other}</a><div class="jumbotron">{content}</div></section>"#
    )
}

/// Persists the opposite of the current mode and returns it. The new mode applies from the next run.
pub fn toggle_mode(store: &dyn PreferenceStore) -> Result<Mode> {
    let mode = store::read_mode(store).toggled();
    store::write_mode(store, mode)?;

    info!("Switched to {mode} mode; it takes effect on the next run.");
    Ok(mode)
}
