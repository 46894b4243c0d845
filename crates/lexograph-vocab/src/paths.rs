//! IRI → output-path mapping.
//!
//! Pure and total: every function returns a path for every input string,
//! malformed or not. The mapping drops the `http(s)` scheme marker (keeping
//! the leading slash), drops any fragment, and names directory-like IRIs
//! `index`. Repeated slashes pass through untouched.

/// Relative output path for an IRI, optionally with an extension appended.
///
/// `to_file_path("http://w3id.org/class/x/S393#", Some("html"))` returns
/// `"/w3id.org/class/x/S393.html"`. An IRI without scheme, trailing slash or
/// fragment maps to itself verbatim.
pub fn to_file_path(iri: &str, extension: Option<&str>) -> String {
    let stripped = strip_scheme(iri);
    let mut path = stripped.split('#').next().unwrap_or_default().to_string();
    if path.ends_with('/') {
        path.push_str("index");
    }
    match extension {
        Some(ext) => format!("{path}.{ext}"),
        None => path,
    }
}

/// Replace the final path segment of `url` with the final path segment of
/// `replacement`. Used to derive container links (e.g. a collection page
/// path from a member concept's path).
pub fn replace_last_segment(url: &str, replacement: &str, extension: Option<&str>) -> String {
    let path = to_file_path(url, None);
    let tail = last_segment(&to_file_path(replacement, None)).to_string();
    let replaced = match path.rfind('/') {
        Some(i) => format!("{}/{}", &path[..i], tail),
        None => path,
    };
    match extension {
        Some(ext) => format!("{replaced}.{ext}"),
        None => replaced,
    }
}

/// Path relative to a sibling page, for intra-site navigation:
/// `relative_link("http://w3id.org/class/x/1", "de.html")` is `"../1.de.html"`.
pub fn relative_link(iri: &str, extension: &str) -> String {
    format!("../{}.{}", last_segment(&to_file_path(iri, None)), extension)
}

/// Fragment of an IRI, without the `#`, if present and non-empty.
pub fn fragment(iri: &str) -> Option<String> {
    let parsed = url::Url::parse(iri).ok()?;
    parsed
        .fragment()
        .filter(|f| !f.is_empty())
        .map(str::to_string)
}

/// Element id for a record: its fragment when it has one, the full IRI
/// otherwise.
pub fn dom_id(iri: &str) -> String {
    fragment(iri).unwrap_or_else(|| iri.to_string())
}

fn strip_scheme(iri: &str) -> &str {
    iri.strip_prefix("https:/")
        .or_else(|| iri.strip_prefix("http:/"))
        .unwrap_or(iri)
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
