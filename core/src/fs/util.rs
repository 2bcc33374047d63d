use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path};

use tempfile::NamedTempFile;

use crate::error::ShellError;

use super::Result;

/// Recognised image file extensions (lowercase, without the dot).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Reduce a caller-supplied name or relative path to its final segment.
///
/// `/`, `\` and the drive separator `:` all split segments regardless of platform, so a name
/// such as `C:evil.png` cannot carry a Windows drive prefix. The result is always a single
/// normal path component.
pub fn sanitize_file_name(raw: &str) -> Result<String> {
    let base = raw
        .trim()
        .rsplit(['/', '\\', ':'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." || base.contains('\0') {
        return Err(ShellError::InvalidName(raw.to_string()));
    }

    let mut components = Path::new(base).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(base.to_string()),
        _ => Err(ShellError::InvalidName(raw.to_string())),
    }
}

/// The recognised image extension of `name`, lowercased, if it has one.
pub fn image_extension(name: &str) -> Option<&'static str> {
    let lower = name.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().copied().find(|ext| {
        lower
            .strip_suffix(ext)
            .map(|stem| stem.ends_with('.'))
            .unwrap_or(false)
    })
}

/// Case-insensitive suffix check; dot-files such as `.png` count, matching how names are listed.
pub fn has_image_extension(name: &str) -> bool {
    image_extension(name).is_some()
}

/// Write `data` to `target` through a temp file in the same directory, replacing any file that
/// already exists there.
pub fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    let parent = target
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|err| ShellError::io_at("creating directory", parent, err))?;

    let write_err = |err: io::Error| ShellError::io_at("writing", target, err);
    let mut temp = NamedTempFile::new_in(parent).map_err(write_err)?;
    temp.write_all(data).map_err(write_err)?;
    temp.flush().map_err(write_err)?;

    match temp.persist(target) {
        Ok(_) => Ok(()),
        Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
            if let Err(remove_err) = fs::remove_file(target) {
                if remove_err.kind() != io::ErrorKind::NotFound {
                    return Err(write_err(remove_err));
                }
            }
            err.file.persist(target).map(|_| ()).map_err(|persist_err| write_err(persist_err.error))
        }
        Err(err) => Err(write_err(err.error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn strips_traversal_sequences() {
        assert_eq!(sanitize_file_name("../../x.png").unwrap(), "x.png");
        assert_eq!(sanitize_file_name("images/dragon.png").unwrap(), "dragon.png");
        assert_eq!(sanitize_file_name("..\\..\\Windows\\evil.png").unwrap(), "evil.png");
        assert_eq!(sanitize_file_name("/etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_file_name("  map.webp ").unwrap(), "map.webp");
    }

    #[test]
    fn strips_windows_drive_prefixes() {
        assert_eq!(sanitize_file_name("C:evil.png").unwrap(), "evil.png");
        assert_eq!(sanitize_file_name("C:..\\x.png").unwrap(), "x.png");
        assert_eq!(sanitize_file_name("D:\\maps\\keep.gif").unwrap(), "keep.gif");
        assert!(sanitize_file_name("C:").is_err());
        assert!(sanitize_file_name("C:..").is_err());
    }

    #[test]
    fn reports_the_matched_extension() {
        assert_eq!(image_extension("Portrait.JPEG"), Some("jpeg"));
        assert_eq!(image_extension("map.png"), Some("png"));
        assert_eq!(image_extension("notes.txt"), None);
    }

    #[test]
    fn rejects_names_without_a_file_segment() {
        for raw in ["", "   ", ".", "..", "images/..", "images/", "a\0b.png"] {
            let err = sanitize_file_name(raw).expect_err(raw);
            assert!(matches!(err, ShellError::InvalidName(_)));
        }
    }

    #[test]
    fn matches_image_extensions_case_insensitively() {
        assert!(has_image_extension("token.PNG"));
        assert!(has_image_extension("map.JpEg"));
        assert!(has_image_extension("a.webp"));
        assert!(has_image_extension(".gif"));
        assert!(!has_image_extension("notes.txt"));
        assert!(!has_image_extension("png"));
        assert!(!has_image_extension("archive.png.zip"));
        assert!(!has_image_extension("scan.bmp"));
    }

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested").join("state.json");

        atomic_write(&target, b"first").expect("first write");
        atomic_write(&target, b"second").expect("second write");

        assert_eq!(fs::read(&target).unwrap(), b"second");
        let leftovers = fs::read_dir(target.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
