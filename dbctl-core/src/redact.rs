//! Credential redaction for datasource URLs before they reach the log

use url::Url;

const MASK: &str = "***";
const UNPARSEABLE: &str = "[unparseable url]";

/// libpq connection parameters that carry a secret
const SECRET_PARAMS: &[&str] = &["password", "sslpassword"];

fn is_secret_param(key: &str) -> bool {
    SECRET_PARAMS.iter().any(|name| key.eq_ignore_ascii_case(name))
}

/// Replace the password component of `raw` with `***`.
///
/// Query parameters named `password` or `sslpassword` are masked too. Input that does not
/// parse as a URL is never echoed back.
pub fn redact_url(raw: &str) -> String {
    let mut url = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return UNPARSEABLE.to_string(),
    };

    if url.password().is_some() && url.set_password(Some(MASK)).is_err() {
        return UNPARSEABLE.to_string();
    }

    let has_secret_param = url
        .query_pairs()
        .any(|(key, _)| is_secret_param(&key));
    if has_secret_param {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| {
                if is_secret_param(&key) {
                    (key.into_owned(), MASK.to_string())
                } else {
                    (key.into_owned(), value.into_owned())
                }
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    url.to_string()
}
