//! Blank ("kiosk") sessions: nothing is loaded from or saved to disk.
//!
//! A shared link opts in when any of `blank`, `fresh` or `kiosk` is `1`.

use anyhow::{Context, Result};
use url::Url;

pub const BLANK_PARAMS: [&str; 3] = ["blank", "fresh", "kiosk"];

fn parse_link(link: &str) -> Result<Url> {
    Url::parse(link)
        .or_else(|_| Url::parse("http://local/").and_then(|base| base.join(link)))
        .with_context(|| format!("invalid link '{link}'"))
}

/// True when the link asks for a blank session. Only the first value of a
/// repeated parameter counts.
pub fn is_blank_link(link: &str) -> Result<bool> {
    let url = parse_link(link)?;
    Ok(BLANK_PARAMS.iter().any(|param| {
        url.query_pairs()
            .find(|(k, _)| k == param)
            .is_some_and(|(_, v)| v == "1")
    }))
}

/// `base` with `blank=1` set, for handing out demo links.
pub fn blank_share_url(base: &str) -> Result<String> {
    let mut url = Url::parse(base).with_context(|| format!("invalid URL '{base}'"))?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "blank")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair("blank", "1");
    Ok(url.to_string())
}
