//! El Mundo front-page profile.
//!
//! Headlines on the front page are `.ue-c-cover-content__headline` nodes
//! nested inside the cover link. The extra-small mobile covers duplicate
//! stories shown elsewhere on the page and are excluded.

use super::SourceProfile;
use crate::models::SourceIdentifier;

const SCRAPE_URL: &str = "https://www.elmundo.es/";
const LINK_SELECTOR: &str =
    "article:not(.ue-c-cover-content--xs-from-mobile) .ue-c-cover-content__headline";
const TITLE_SELECTOR: &str = "h1.ue-c-article__headline";
const BODY_SELECTOR: &str = ".ue-c-article__body p";

pub fn profile() -> SourceProfile {
    SourceProfile {
        identifier: SourceIdentifier::ElMundo,
        scrape_url: SCRAPE_URL.to_string(),
        link_selector: LINK_SELECTOR.to_string(),
        title_selector: TITLE_SELECTOR.to_string(),
        body_selector: BODY_SELECTOR.to_string(),
    }
}
