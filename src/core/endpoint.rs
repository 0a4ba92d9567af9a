//! Preview endpoint URL composition.

use url::Url;

use crate::core::event::RequestTarget;
use crate::core::token::RequestToken;

/// Builds `{action_url}?callback=..&url=..|assetId=..&<passthrough>`.
///
/// Existing query pairs on `action_url` are kept ahead of the request's own pairs.
pub fn preview_url(
    action_url: &Url,
    target: &RequestTarget,
    token: &RequestToken,
    parameters: &[(String, String)],
) -> Url {
    let mut url = action_url.clone();
    {
        let (key, value) = target.query_pair();
        let mut query = url.query_pairs_mut();
        query.append_pair("callback", token.as_str());
        query.append_pair(key, &value);
        for (key, value) in parameters {
            query.append_pair(key, value);
        }
    }
    url
}
