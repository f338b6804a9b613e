use std::env;
use std::path::{Path, PathBuf};

/// Resolve a relative input path against the crate directory, falling back
/// to the working directory for trees that do not sit next to the crate.
pub fn resolve_input_path(path: &Path) -> PathBuf {
    let cwd = env::current_dir().ok();
    resolve_input_path_from(path, Path::new(env!("CARGO_MANIFEST_DIR")), cwd.as_deref())
}

fn resolve_input_path_from(path: &Path, manifest_dir: &Path, cwd: Option<&Path>) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let manifest_candidate = manifest_dir.join(path);
    if manifest_candidate.exists() {
        return manifest_candidate;
    }
    if let Some(candidate) = cwd.map(|cwd| cwd.join(path)).filter(|p| p.exists()) {
        return candidate;
    }
    manifest_candidate
}

pub fn display_path(path: &Path, base: Option<&Path>) -> String {
    if let Some(base) = base {
        if let Ok(relative) = path.strip_prefix(base) {
            return relative.display().to_string();
        }
    }
    path.display().to_string()
}
