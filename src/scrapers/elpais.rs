//! El País front-page profile.

use super::SourceProfile;
use crate::models::SourceIdentifier;

const SCRAPE_URL: &str = "https://elpais.com";
const LINK_SELECTOR: &str = "article h2 a";
const TITLE_SELECTOR: &str = "h1";
const BODY_SELECTOR: &str = "div.a_c p";

pub fn profile() -> SourceProfile {
    SourceProfile {
        identifier: SourceIdentifier::ElPais,
        scrape_url: SCRAPE_URL.to_string(),
        link_selector: LINK_SELECTOR.to_string(),
        title_selector: TITLE_SELECTOR.to_string(),
        body_selector: BODY_SELECTOR.to_string(),
    }
}
