use std::borrow::Cow;

use gh_emoji as emoji;
use once_cell::sync::Lazy;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};
use regex::{Captures, Regex};

use super::Stylesheet;
use crate::parse::LinkAddress;
use crate::prelude::*;

static EMOJI_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#":([a-z1238+-][a-z0-9_-]*):"#).unwrap());

/// Fetches a page's raw Markdown source and converts it locally.
///
/// Unlike [`HtmlStrategy`](super::HtmlStrategy), links in the output are left exactly as written.
#[derive(Debug)]
pub struct MarkdownStrategy {
    raw_host: String,
    emoji: bool,
    pub(super) stylesheet: Stylesheet,
}

impl MarkdownStrategy {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            raw_host: config.source.raw_host.trim_end_matches('/').to_owned(),
            emoji: config.render.emoji,
            stylesheet: Stylesheet::new(None)?,
        })
    }

    /// The content type segment of the link doubles as the ref (branch) to read from.
    pub fn url_for(&self, link: &LinkAddress) -> String {
        format!(
            "{}/{}/{}/{}/{}.md",
            self.raw_host, link.content_type, link.owner, link.repository, link.page_path
        )
    }

    pub fn render(&self, body: &str) -> String {
        let parser = init(body);
        let emoji = self.emoji;
        let mut in_code_block = false;

        let events = merge_text(parser).map(move |event| match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code_block = true;
                Event::Start(Tag::CodeBlock(kind))
            }
            Event::End(Tag::CodeBlock(kind)) => {
                in_code_block = false;
                Event::End(Tag::CodeBlock(kind))
            }
            Event::Text(text) if emoji && !in_code_block => {
                let expanded = match expand_emoji(&text) {
                    Cow::Owned(expanded) => Some(expanded),
                    Cow::Borrowed(_) => None,
                };

                match expanded {
                    Some(expanded) => Event::Text(CowStr::from(expanded)),
                    None => Event::Text(text),
                }
            }
            event => event,
        });

        write(events)
    }
}

/// Initializes a [`Parser`] with the GitHub-flavored extensions enabled.
fn init(input: &str) -> Parser<'_, '_> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    Parser::new_ext(input, options)
}

/// Consume an event stream, buffering the HTML output into a final [`String`].
fn write<'a>(events: impl Iterator<Item = Event<'a>>) -> String {
    let mut html_output = String::new();
    html::push_html(&mut html_output, events);
    html_output
}

/// The parser may split a single run of text into several events (e.g. around an unmatched `_`),
/// which would hide shortcodes like `:white_check_mark:` from the emoji pass.
fn merge_text<'a>(events: impl Iterator<Item = Event<'a>>) -> impl Iterator<Item = Event<'a>> {
    let mut events = events.peekable();

    std::iter::from_fn(move || {
        let first = match events.next()? {
            Event::Text(text) => text,
            event => return Some(event),
        };

        let mut text: Option<String> = None;
        while let Some(Event::Text(next)) = events.peek() {
            text.get_or_insert_with(|| first.to_string()).push_str(next);
            events.next();
        }

        match text {
            Some(text) => Some(Event::Text(CowStr::from(text))),
            None => Some(Event::Text(first)),
        }
    })
}

fn expand_emoji(text: &str) -> Cow<'_, str> {
    EMOJI_REGEX.replace_all(text, |caps: &Captures| match emoji::get(&caps[1]) {
        Some(emoji) => emoji.to_owned(),
        None => caps[0].to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    fn strategy() -> MarkdownStrategy {
        MarkdownStrategy::new(&Config::default()).unwrap()
    }

    #[test]
    fn raw_url() {
        let link = LinkAddress {
            owner: "a".into(),
            repository: "b".into(),
            content_type: "master".into(),
            page_path: "Home".into(),
        };

        assert_eq!(
            strategy().url_for(&link),
            "https://raw.githubusercontent.com/master/a/b/Home.md"
        );
    }

    #[test]
    fn nested_page_url() {
        let link = LinkAddress::parse("wiki-gh/a/b/wiki/Setup/Advanced", "wiki-gh").unwrap();

        assert_eq!(
            strategy().url_for(&link),
            "https://raw.githubusercontent.com/wiki/a/b/Setup/Advanced.md"
        );
    }

    #[test]
    fn gfm() {
        let source = indoc! {"
            # Title

            | a | b |
            |---|---|
            | 1 | 2 |

            ~~gone~~

            - [x] done
        "};

        let out = strategy().render(source);

        assert!(out.contains("<h1>Title</h1>"));
        assert!(out.contains("<table>"));
        assert!(out.contains("<del>gone</del>"));
        assert!(out.contains(r#"type="checkbox""#));
    }

    #[test]
    fn links_untouched() {
        let out = strategy().render("[next](/alice/repo/wiki/Next)");
        assert!(out.contains(r#"<a href="/alice/repo/wiki/Next">next</a>"#));
    }

    #[test]
    fn emoji() {
        let out = strategy().render("Ship it :rocket: :not_a_real_emoji:");

        assert!(out.contains("🚀"));
        assert!(out.contains(":not_a_real_emoji:"));
    }

    #[test]
    fn emoji_not_in_code() {
        let out = strategy().render("```\n:rocket:\n```\n\n`:rocket:`");

        assert!(!out.contains("🚀"));
        assert_eq!(out.matches(":rocket:").count(), 2);
    }

    #[test]
    fn emoji_disabled() {
        let mut config = Config::default();
        config.render.emoji = false;

        let out = MarkdownStrategy::new(&config).unwrap().render(":rocket:");
        assert!(out.contains(":rocket:"));
    }
}
