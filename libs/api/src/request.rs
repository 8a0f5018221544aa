use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};

/// `?page=` of listing views. Kept as text: unparsable values fall back to
/// the first page instead of rejecting the request.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PageParam {
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub page: Option<String>,
}

impl PageParam {
    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }
}
