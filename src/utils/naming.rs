use chrono::Utc;
use rand::Rng;

/// Upper bound (inclusive) of the random component in stored names
const RANDOM_SUFFIX_MAX: u32 = 1_000_000_000;

/// Returns the extension of the client-supplied name, leading dot included.
///
/// Only the basename is considered; dotfiles and names without a dot have no
/// extension. Extensions with anything but ASCII alphanumerics, `-` or `_`
/// are dropped so the generated name stays filesystem-safe.
pub fn original_extension(original: &str) -> &str {
    let basename = original.rsplit(['/', '\\']).next().unwrap_or(original);

    match basename.rfind('.') {
        Some(0) | None => "",
        Some(idx) => {
            let ext = &basename[idx..];
            if ext[1..]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                ext
            } else {
                ""
            }
        }
    }
}

/// Builds `<millis>-<random><ext>` for a new upload.
pub fn generate_stored_name(original: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let nonce: u32 = rand::thread_rng().gen_range(0..=RANDOM_SUFFIX_MAX);
    format!("{}-{}{}", millis, nonce, original_extension(original))
}
