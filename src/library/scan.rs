use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::ImportSettings;

/// True if `path` carries one of the configured audio extensions.
pub fn is_supported(path: &Path, settings: &ImportSettings) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .any(|e| !e.is_empty() && e == ext)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Expand the dropped `inputs` into the list of supported audio files.
///
/// Files are kept in the order given. Directories are walked in file-name
/// order, honoring the recursion and hidden-file settings.
pub fn collect_candidates(inputs: &[PathBuf], settings: &ImportSettings) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();

    for input in inputs {
        if input.is_dir() {
            walk_dir(input, settings, &mut out);
        } else if is_supported(input, settings) {
            out.push(input.clone());
        }
    }

    out
}

fn walk_dir(dir: &Path, settings: &ImportSettings, out: &mut Vec<PathBuf>) {
    let mut walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file() && is_supported(path, settings) {
            out.push(path.to_path_buf());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_supported_matches_configured_extensions_case_insensitive() {
        let settings = ImportSettings::default();
        assert!(is_supported(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_supported(Path::new("/tmp/a.MP3"), &settings));
        assert!(!is_supported(Path::new("/tmp/a.flac"), &settings));
        assert!(!is_supported(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_supported(Path::new("/tmp/a"), &settings));

        let settings = ImportSettings {
            extensions: vec![".FLAC".into(), " ".into()],
            ..ImportSettings::default()
        };
        assert!(is_supported(Path::new("/tmp/a.flac"), &settings));
        assert!(!is_supported(Path::new("/tmp/a.mp3"), &settings));
    }

    #[test]
    fn collect_keeps_explicit_files_in_order_and_drops_others() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("b.mp3");
        let a = dir.path().join("a.MP3");
        let txt = dir.path().join("notes.txt");
        for p in [&a, &b, &txt] {
            fs::write(p, b"x").unwrap();
        }

        let got = collect_candidates(&[b.clone(), txt, a.clone()], &ImportSettings::default());
        assert_eq!(got, vec![b, a]);
    }

    #[test]
    fn collect_walks_directories_skipping_hidden() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"x").unwrap();
        fs::write(dir.path().join("b.mp3"), b"x").unwrap();
        fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("c.mp3"), b"x").unwrap();

        let got = collect_candidates(&[dir.path().to_path_buf()], &ImportSettings::default());
        let names: Vec<String> = got
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.mp3", "b.mp3", "c.mp3"]);
    }

    #[test]
    fn collect_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"x").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"x").unwrap();

        let settings = ImportSettings {
            recursive: false,
            ..ImportSettings::default()
        };
        let got = collect_candidates(&[dir.path().to_path_buf()], &settings);
        assert_eq!(got, vec![dir.path().join("root.mp3")]);
    }
}
