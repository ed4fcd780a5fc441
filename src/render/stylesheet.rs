use grass::{Options, OutputStyle};

use crate::prelude::*;

/// SCSS source for the fixed content block rules, bundled into the binary.
const BLOCK_STYLE_SOURCE: &str = include_str!("../../assets/wiki-gh.scss");

/// Head markup for one page: the compiled block rules, plus an optional external stylesheet.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    pub inline: String,
    pub external: Option<String>,
}

impl Stylesheet {
    pub fn new(external: Option<String>) -> Result<Self> {
        Ok(Self {
            inline: compile_block_style()?,
            external,
        })
    }

    pub fn to_markup(&self) -> String {
        let mut markup = format!("<style>{}</style>", self.inline);

        if let Some(url) = &self.external {
            markup.push_str(&format!(
                r#"<link rel="stylesheet" href="{}" type="text/css" />"#,
                url.replace('"', "&quot;")
            ));
        }

        markup
    }
}

fn compile_block_style() -> Result<String> {
    let options = Options::default().style(OutputStyle::Compressed);

    let css = grass::from_string(BLOCK_STYLE_SOURCE, &options)
        .map_err(|err| eyre!("{err}"))
        .wrap_err("Failed to compile the bundled content block stylesheet.")?;

    Ok(css.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles() {
        let sheet = Stylesheet::new(None).unwrap();

        assert!(sheet.inline.contains(".wiki-gh-content"));
        assert!(sheet.inline.contains(".jumbotron"));
        assert!(sheet.inline.contains(".wiki-gh-toggle"));
        assert!(!sheet.inline.contains('$'));
    }

    #[test]
    fn external_link() {
        let sheet = Stylesheet::new(Some("https://example.com/a.css".into())).unwrap();
        let markup = sheet.to_markup();

        assert!(markup.starts_with("<style>"));
        assert!(markup.ends_with(r#"<link rel="stylesheet" href="https://example.com/a.css" type="text/css" />"#));
    }
}
