//! File name and path utilities

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Replace the extension of `path` (everything from the last `.` of the
/// final component) with `suffix`; append `suffix` if there is no `.`.
///
/// `suffix` carries its own leading dot: `change_suffix("./a.xsl", ".out")`
/// gives `./a.out`. A file name made only of an extension (`.hidden`) keeps
/// nothing of it.
pub fn change_suffix(path: &Path, suffix: &str) -> PathBuf {
    let Some(name) = path.file_name() else {
        let mut joined = path.as_os_str().to_owned();
        joined.push(suffix);
        return PathBuf::from(joined);
    };

    let name = name.to_string_lossy();
    let stem = match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => &name[..],
    };

    let mut file_name = OsString::from(stem);
    file_name.push(suffix);
    path.with_file_name(file_name)
}

/// True iff `path` exists and is a regular file. Failure to stat counts as
/// "does not exist".
pub fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.file_type().is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_last_extension() {
        assert_eq!(change_suffix(Path::new("./a.xsl"), ".out"), PathBuf::from("./a.out"));
        assert_eq!(
            change_suffix(Path::new("./test-10-3.xsl"), ".stand.err"),
            PathBuf::from("./test-10-3.stand.err")
        );
        assert_eq!(
            change_suffix(Path::new("dir/b.tar.xsl"), ".xml"),
            PathBuf::from("dir/b.tar.xml")
        );
    }

    #[test]
    fn appends_when_there_is_no_extension() {
        assert_eq!(change_suffix(Path::new("./noext"), ".xml"), PathBuf::from("./noext.xml"));
        assert_eq!(change_suffix(Path::new("plain"), ".err"), PathBuf::from("plain.err"));
    }

    #[test]
    fn dots_in_directories_are_ignored() {
        assert_eq!(
            change_suffix(Path::new("exslt.d/strings"), ".out"),
            PathBuf::from("exslt.d/strings.out")
        );
    }

    #[test]
    fn regular_file_checks() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.xml");
        fs::write(&file, "<a/>").unwrap();

        assert!(is_regular_file(&file));
        assert!(!is_regular_file(dir.path()));
        assert!(!is_regular_file(&dir.path().join("missing.xml")));
    }
}
