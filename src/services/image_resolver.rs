use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::sync::OnceLock;

/// Inline graphic shown once every candidate URL for an image has failed.
/// A data URI so the placeholder itself can never fail to load.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 120 90'%3E%3Crect width='120' height='90' fill='%23e8e4dc'/%3E%3Cpath d='M30 62l18-22 14 16 10-11 18 17z' fill='%23b9b2a6'/%3E%3Ccircle cx='44' cy='30' r='7' fill='%23b9b2a6'/%3E%3C/svg%3E";

/// Matches encodeURIComponent: everything but alphanumerics and
/// `- _ . ! ~ * ' ( )` is percent-encoded, so legacy paths come out
/// exactly as the old site produced them (`%20` for spaces, `%2F` for `/`).
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn hex24() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("^[0-9a-fA-F]{24}").unwrap())
}

/// Property records carry image references in four untagged shapes.
/// Classification happens once, up front, before any URL building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Full http(s) URL, query already stripped.
    AbsoluteUrl(String),
    /// Relative blob-store path, contains `/api/images/`.
    BlobPath(String),
    /// 24-hex blob-store id, trailing junk removed.
    BlobId(String),
    /// Pre-migration filesystem-style path, normalized to `/` separators
    /// with any leading `./` stripped.
    LegacyPath(String),
    Empty,
}

/// Classify a raw reference string. First match wins, in this order:
/// query stripping, absolute URL, blob path, blob id, legacy path.
///
/// A leading run shorter than 24 hex characters is NOT treated as an id;
/// it falls through to the legacy-path rule. Old records rely on this.
pub fn classify(raw: &str) -> ImageRef {
    let trimmed = raw.trim();
    // Any `?...` suffix is display metadata (category), never part of the
    // resource; strip before matching.
    let cleaned = trimmed.split_once('?').map(|(p, _)| p).unwrap_or(trimmed);
    if cleaned.is_empty() {
        return ImageRef::Empty;
    }
    if cleaned.starts_with("http://") || cleaned.starts_with("https://") {
        return ImageRef::AbsoluteUrl(cleaned.to_string());
    }
    if cleaned.contains("/api/images/") {
        return ImageRef::BlobPath(cleaned.to_string());
    }
    if let Some(m) = hex24().find(cleaned) {
        // Keep only the 24-hex run; ids show up with junk like `:1` appended
        return ImageRef::BlobId(m.as_str().to_string());
    }
    let normalized = cleaned.replace('\\', "/");
    let normalized = normalized.strip_prefix("./").unwrap_or(&normalized);
    ImageRef::LegacyPath(normalized.to_string())
}

/// The `category` query parameter of the original reference, if present.
/// Display metadata only; it never reaches the blob store.
pub fn category(raw: &str) -> Option<String> {
    let (_, query) = raw.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == "category" && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Build the ordered list of URLs to attempt for one reference.
///
/// Legacy paths get two candidates: the blob-store filename lookup first,
/// then the old website path. The latter is skipped on localhost, where the
/// cross-origin request is doomed anyway.
pub fn resolve_candidates(
    raw: &str,
    blob_store_base: &str,
    legacy_site_base: &str,
    local_host: bool,
) -> Vec<String> {
    let blob_base = blob_store_base.trim_end_matches('/');
    match classify(raw) {
        ImageRef::Empty => Vec::new(),
        ImageRef::AbsoluteUrl(url) => vec![url],
        ImageRef::BlobPath(path) => {
            if path.starts_with('/') {
                vec![format!("{}{}", blob_base, path)]
            } else {
                vec![format!("{}/{}", blob_base, path)]
            }
        }
        ImageRef::BlobId(id) => vec![format!("{}/api/images/{}", blob_base, id)],
        ImageRef::LegacyPath(path) => {
            let mut candidates = vec![format!(
                "{}/api/images/filename/{}",
                blob_base,
                utf8_percent_encode(&path, URI_COMPONENT)
            )];
            if !local_host {
                candidates.push(format!(
                    "{}/{}",
                    legacy_site_base.trim_end_matches('/'),
                    path
                ));
            }
            candidates
        }
    }
}

pub fn is_local_host(host: &str) -> bool {
    let name = host.split(':').next().unwrap_or(host);
    name.eq_ignore_ascii_case("localhost") || name == "127.0.0.1"
}

/// Per-image retry cursor. `Pending(i)` points at the candidate currently
/// being attempted; `Exhausted` is terminal and accepts no transitions,
/// which is what keeps the placeholder from ever re-triggering a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Pending(usize),
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct ImageLoader {
    candidates: Vec<String>,
    state: RetryState,
}

impl ImageLoader {
    pub fn new(candidates: Vec<String>) -> Self {
        let state = if candidates.is_empty() {
            // No rule matched the reference: straight to the placeholder
            RetryState::Exhausted
        } else {
            RetryState::Pending(0)
        };
        Self { candidates, state }
    }

    /// The URL to render right now: the candidate under the cursor, or the
    /// placeholder once exhausted.
    pub fn current(&self) -> &str {
        match self.state {
            RetryState::Pending(index) => &self.candidates[index],
            RetryState::Exhausted => PLACEHOLDER_IMAGE,
        }
    }

    /// Record a load failure for the current candidate. Returns true while
    /// there is another candidate to try; once it returns false the error
    /// handler is considered detached and further calls are no-ops.
    pub fn on_load_failed(&mut self) -> bool {
        match self.state {
            RetryState::Pending(index) if index + 1 < self.candidates.len() => {
                self.state = RetryState::Pending(index + 1);
                true
            }
            RetryState::Pending(_) => {
                self.state = RetryState::Exhausted;
                false
            }
            RetryState::Exhausted => false,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == RetryState::Exhausted
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
}
