//! Placeholder specialization for installer metadata templates.
//!
//! Templates are plain files containing literal tokens such as `<<VERSION>>`.
//! Replacement is byte-oriented and line-by-line so property lists and NSIS
//! scripts pass through untouched apart from the tokens themselves.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{
    collections::{BTreeMap, BTreeSet},
    io::Write,
    path::{Path, PathBuf},
};

/// Token -> replacement value.
pub type Replacements = BTreeMap<String, String>;

/// Builds a [`Replacements`] map from string pairs.
pub fn replacements<I, K, V>(pairs: I) -> Replacements
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Specializes `template` into `destination`.
///
/// Every token in `replacements` must occur at least once in the template.
/// If any token is missing the call fails with [`Error::TemplateIncomplete`]
/// and `destination` is not touched. On success the result is written to a
/// sibling temporary file and renamed over `destination`, so `destination`
/// may be the template itself.
pub async fn specialize(
    template: &Path,
    destination: &Path,
    replacements: &Replacements,
) -> Result<()> {
    let content = tokio::fs::read(template)
        .await
        .fs_context("reading template", template)?;

    let specialized = apply(&content, replacements).map_err(|missing| {
        Error::TemplateIncomplete {
            path: template.to_path_buf(),
            missing,
        }
    })?;

    let permissions = tokio::fs::metadata(template)
        .await
        .fs_context("reading template metadata", template)?
        .permissions();

    let destination = destination.to_path_buf();
    tokio::task::spawn_blocking(move || write_replacing(&destination, &specialized, permissions))
        .await
        .map_err(|e| Error::GenericError(format!("template write task panicked: {}", e)))?
}

/// Applies `replacements` to every line of `content`.
///
/// Returns the missing tokens when the completeness check fails.
fn apply(content: &[u8], replacements: &Replacements) -> std::result::Result<Vec<u8>, Vec<String>> {
    let mut output = Vec::with_capacity(content.len());
    let mut applied = BTreeSet::new();

    for original in content.split_inclusive(|b| *b == b'\n') {
        // tokens introduced by another token's value do not count as present
        applied.extend(
            replacements
                .keys()
                .filter(|token| contains(original, token.as_bytes()))
                .map(String::as_str),
        );

        let mut line = original.to_vec();
        for (token, value) in replacements {
            if let Some(replaced) = replace_all(&line, token.as_bytes(), value.as_bytes()) {
                line = replaced;
            }
        }

        output.extend_from_slice(&line);
    }

    let missing: Vec<String> = replacements
        .keys()
        .filter(|token| !applied.contains(token.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(output)
    } else {
        Err(missing)
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Replaces every occurrence of `from` in `haystack`, or returns `None` when
/// there is nothing to replace.
fn replace_all(haystack: &[u8], from: &[u8], to: &[u8]) -> Option<Vec<u8>> {
    if from.is_empty() || haystack.len() < from.len() {
        return None;
    }

    let mut result = Vec::with_capacity(haystack.len());
    let mut found = false;
    let mut i = 0;

    while i < haystack.len() {
        if haystack[i..].starts_with(from) {
            result.extend_from_slice(to);
            i += from.len();
            found = true;
        } else {
            result.push(haystack[i]);
            i += 1;
        }
    }

    found.then_some(result)
}

fn write_replacing(
    destination: &Path,
    content: &[u8],
    permissions: std::fs::Permissions,
) -> Result<()> {
    let dir = parent_dir(destination);

    let mut file =
        tempfile::NamedTempFile::new_in(&dir).fs_context("creating temporary file in", &dir)?;
    file.write_all(content)
        .fs_context("writing specialized template", destination)?;
    file.as_file()
        .set_permissions(permissions)
        .fs_context("setting permissions on", destination)?;
    file.persist(destination)
        .map_err(|e| e.error)
        .fs_context("replacing", destination)?;

    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
