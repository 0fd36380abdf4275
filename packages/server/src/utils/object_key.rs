use std::path::Path;

use uuid::Uuid;

/// Extension of `filename` including the leading dot, or `""` if it has none.
///
/// Only the final path component is considered, so a client-supplied
/// `C:\covers\dune.jpg` or `covers/dune.jpg` still yields `.jpg`.
pub fn file_extension(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    Path::new(base)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

/// Fresh object key for an uploaded cover: `<uuid v7><original extension>`.
pub fn new_cover_key(original_filename: &str) -> String {
    format!("{}{}", Uuid::now_v7(), file_extension(original_filename))
}

/// Object key of a stored cover, recovered from its public URL.
///
/// The key is the last `/`-delimited segment; the store re-applies its prefix.
pub fn key_from_url(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|key| !key.is_empty())
}
