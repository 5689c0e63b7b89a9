/// Families whose repo names get collapsed to `<family>-<rest>`, checked in order.
pub const NORMALIZED_FAMILIES: [&str; 2] = ["llama", "mistral"];

const GGUF_SUFFIX: &str = "-gguf";

/// Derives the local config name from an `owner/repo` hub id.
///
/// 1. lower-cased repo segment
/// 2. `llama` / `mistral` repos become `<family>-<text after the last occurrence>`
/// 3. trailing `-gguf` dropped
/// 4. anything but alphanumerics, `-` and `_` replaced with `-`
/// 5. leading/trailing `-` and `_` trimmed
///
/// Returns `None` when nothing usable is left.
pub fn local_model_name(model_id: &str) -> Option<String> {
    let repo = model_id
        .rsplit('/')
        .next()
        .unwrap_or(model_id)
        .to_lowercase();

    let name = rewrite_family(&repo);
    let name = name.strip_suffix(GGUF_SUFFIX).unwrap_or(&name);

    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '-' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Step 2. An empty suffix (repo ends in the family word) keeps the repo as is.
fn rewrite_family(repo: &str) -> String {
    for family in NORMALIZED_FAMILIES {
        if let Some(idx) = repo.rfind(family) {
            let suffix = repo[idx + family.len()..]
                .trim_start_matches(|c: char| matches!(c, '-' | '_' | '.'));
            if suffix.is_empty() {
                return repo.to_string();
            }
            return format!("{family}-{suffix}");
        }
    }
    repo.to_string()
}
