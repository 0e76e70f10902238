//! Matching dataset items back to requested URLs

use crate::apify::DatasetItem;

/// Find the dataset item produced for `url`
///
/// An exact `loadedUrl` match is preferred. Failing that, the URLs are
/// compared after dropping one trailing slash from each. Within each pass
/// the first item in arrival order wins. No other normalization is applied.
pub fn match_dataset_item<'a>(items: &'a [DatasetItem], url: &str) -> Option<&'a DatasetItem> {
    let wanted = strip_trailing_slash(url);
    items
        .iter()
        .find(|item| item.loaded_url() == Some(url))
        .or_else(|| {
            items.iter().find(|item| {
                item.loaded_url()
                    .is_some_and(|loaded| strip_trailing_slash(loaded) == wanted)
            })
        })
}

fn strip_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}
