use derive_builder::Builder;
use filterlist_syntax::FlagSet;

/// Options of [`FiltersDownloader::download`](crate::FiltersDownloader::download).
#[derive(Clone, Debug, Default)]
pub struct DownloadOptions {
    pub validate_checksum: bool,
    /// Also reject documents that carry no checksum at all
    pub validate_checksum_strict: bool,
    pub allow_empty_response: bool,
}

#[derive(Builder, Clone, Debug, Default)]
#[builder(default, setter(into))]
pub struct DownloadWithRawOptions {
    /// Download the whole list even when a patch could be applied
    pub force: bool,
    /// Raw content of the previous download
    #[builder(setter(into, strip_option))]
    pub raw_filter: Option<String>,
    /// Condition flags. Without them `!#if` blocks are kept as they are.
    #[builder(setter(into, strip_option))]
    pub flags: Option<FlagSet>,
    pub verbose: bool,
    pub validate_checksum: bool,
    pub validate_checksum_strict: bool,
    pub allow_empty_response: bool,
}

impl DownloadWithRawOptions {
    pub fn builder() -> DownloadWithRawOptionsBuilder {
        DownloadWithRawOptionsBuilder::default()
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DownloadResult {
    pub filter: Vec<String>,
    /// Exact downloaded text, the base of the next patch
    pub raw_filter: String,
    pub is_patch_update_failed: bool,
}

#[cfg(test)]
mod test {
    use super::DownloadWithRawOptions;
    use filterlist_syntax::FlagSet;

    #[test]
    fn builder_defaults() {
        let options = DownloadWithRawOptions::builder().build().unwrap();
        assert!(!options.force);
        assert!(options.raw_filter.is_none());
        assert!(options.flags.is_none());
    }

    #[test]
    fn builder_setters() {
        let options = DownloadWithRawOptions::builder()
            .force(true)
            .raw_filter("! Title")
            .flags(FlagSet::new().with("adguard", true))
            .build()
            .unwrap();
        assert!(options.force);
        assert_eq!(options.raw_filter.as_deref(), Some("! Title"));
        assert!(options.flags.unwrap().is_enabled("adguard"));
    }
}
