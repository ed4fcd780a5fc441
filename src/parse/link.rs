use crate::error::PipelineError;

/// Page used when a link names a repository's wiki without naming a page.
pub const DEFAULT_PAGE: &str = "Home";

/// Structured form of a prefixed link, e.g. `wiki-gh/alice/repo/wiki/Setup/Advanced`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAddress {
    pub owner: String,
    pub repository: String,
    pub content_type: String,
    pub page_path: String,
}

impl LinkAddress {
    /// Splits `href` on `/`. The first segment must be `prefix`; the next three are the owner,
    /// repository and content type. Anything after that is the page path, slashes and all.
    pub fn parse(href: &str, prefix: &str) -> Result<Self, PipelineError> {
        let segments: Vec<&str> = href.split('/').collect();

        if segments.len() < 4 || segments[0] != prefix {
            return Err(PipelineError::InvalidLinkAddress {
                href: href.to_owned(),
                segments: segments.len(),
            });
        }

        let page_path = match segments.len() {
            4 => DEFAULT_PAGE.to_owned(),
            5 => segments[4].to_owned(),
            _ => segments[4..].join("/"),
        };

        Ok(LinkAddress {
            owner: segments[1].to_owned(),
            repository: segments[2].to_owned(),
            content_type: segments[3].to_owned(),
            page_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home() {
        let link = LinkAddress::parse("wiki-gh/alice/repo/wiki", "wiki-gh").unwrap();

        assert_eq!(
            link,
            LinkAddress {
                owner: "alice".into(),
                repository: "repo".into(),
                content_type: "wiki".into(),
                page_path: "Home".into(),
            }
        );
    }

    #[test]
    fn single_page() {
        let link = LinkAddress::parse("wiki-gh/alice/repo/wiki/Setup", "wiki-gh").unwrap();
        assert_eq!(link.page_path, "Setup");
    }

    #[test]
    fn nested_page() {
        let link = LinkAddress::parse("wiki-gh/alice/repo/wiki/Setup/Advanced", "wiki-gh").unwrap();
        assert_eq!(link.page_path, "Setup/Advanced");
        assert_eq!(link.content_type, "wiki");
    }

    #[test]
    fn too_short() {
        let err = LinkAddress::parse("wiki-gh/alice/repo", "wiki-gh").unwrap_err();

        assert!(matches!(
            err,
            PipelineError::InvalidLinkAddress { segments: 3, .. }
        ));
    }

    #[test]
    fn wrong_prefix() {
        let err = LinkAddress::parse("other/alice/repo/wiki", "wiki-gh").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidLinkAddress { .. }));
    }

    #[test]
    fn no_charset_validation() {
        let link = LinkAddress::parse("wiki-gh/al ice/re.po/raw", "wiki-gh").unwrap();
        assert_eq!(link.owner, "al ice");
        assert_eq!(link.repository, "re.po");
    }
}
