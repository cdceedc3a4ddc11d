//! Deterministic file naming for artifacts and profiles
//!
//! An artifact name depends only on its own source path: the sanitized file
//! stem plus a short hash of the full path. Rerunning map for a source always
//! lands on the same file, whatever else is in the batch. A hash clash between
//! two distinct paths (compared case-insensitively, since output directories
//! may live on case-insensitive filesystems) falls back to a numeric suffix,
//! assigned in sorted path order.

use crate::error::PipelineError;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use synapse_domain::artifact::ARTIFACT_SUFFIX;

const HASH_CHARS: usize = 8;
const MAX_NUMERIC_SUFFIX: usize = 10_000;

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("static pattern is valid"))
}

/// Replace anything outside `[A-Za-z0-9_.-]` with `_` and trim leading or
/// trailing underscores
pub fn sanitize(name: &str) -> String {
    unsafe_chars()
        .replace_all(name, "_")
        .trim_matches('_')
        .to_string()
}

/// File-name slug for a profile key (sanitized and lowercased)
pub fn profile_slug(key: &str) -> String {
    let slug = sanitize(key).to_lowercase();
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug
    }
}

/// Assign a unique slug to each profile key, in order
///
/// Repeated slugs get `-2`, `-3`, ... so no profile overwrites another.
pub fn unique_slugs<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    keys.into_iter()
        .map(|key| {
            let base = profile_slug(key);
            let mut slug = base.clone();
            let mut n = 2;
            while !taken.insert(slug.clone()) {
                slug = format!("{}-{}", base, n);
                n += 1;
            }
            slug
        })
        .collect()
}

fn base_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = sanitize(&stem);
    if name.is_empty() {
        "source".to_string()
    } else {
        name
    }
}

fn path_hash(source: &Path) -> String {
    let digest = Sha256::digest(source.to_string_lossy().as_bytes());
    let mut hash = hex::encode(digest);
    hash.truncate(HASH_CHARS);
    hash
}

/// Name stem for one source, before any clash resolution
pub fn artifact_stem(source: &Path) -> String {
    format!("{}-{}", base_name(source), path_hash(source))
}

/// Artifact file name for one source
pub fn artifact_name(source: &Path) -> String {
    format!("{}{}", artifact_stem(source), ARTIFACT_SUFFIX)
}

/// Plan artifact file names for a batch of sources
///
/// Returns one name per input, in input order. Each name is
/// [`artifact_name`] of its path unless two distinct paths hash alike. A path
/// that appears twice maps to the same name.
pub fn artifact_names(sources: &[&Path]) -> Result<Vec<String>, PipelineError> {
    let mut order: Vec<usize> = (0..sources.len()).collect();
    order.sort_by(|&a, &b| sources[a].cmp(sources[b]));

    let mut claimed: HashSet<String> = HashSet::new();
    let mut assigned: HashMap<&Path, String> = HashMap::new();
    for idx in order {
        let source = sources[idx];
        if assigned.contains_key(source) {
            continue;
        }

        let stem = artifact_stem(source);
        let mut name = stem.clone();
        let mut n = 2;
        while claimed.contains(&name.to_lowercase()) {
            if n > MAX_NUMERIC_SUFFIX {
                return Err(PipelineError::UnresolvedCollision(
                    source.display().to_string(),
                ));
            }
            name = format!("{}-{}", stem, n);
            n += 1;
        }
        claimed.insert(name.to_lowercase());
        assigned.insert(source, name);
    }

    Ok(sources
        .iter()
        .map(|source| format!("{}{}", assigned[source], ARTIFACT_SUFFIX))
        .collect())
}

/// Collect owned paths for [`artifact_names`]
pub(crate) fn plan_for(paths: &[PathBuf]) -> Result<Vec<String>, PipelineError> {
    let refs: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
    artifact_names(&refs)
}
