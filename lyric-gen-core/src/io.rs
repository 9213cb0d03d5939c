use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Extension of corpus documents.
pub const CORPUS_EXTENSION: &str = "txt";

/// Reads a whole text file into memory.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &Path) -> PathBuf {
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted so that corpus assembly is
/// reproducible. Subdirectories are ignored.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

/// Concatenates the given files of `folder`, in order, with no separator.
pub fn combine_files<P: AsRef<Path>>(folder: P, names: &[String]) -> io::Result<String> {
	let folder = folder.as_ref();
	let mut combined = String::new();
	for name in names {
		combined.push_str(&read_file(folder.join(name))?);
	}
	Ok(combined)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_list_and_combine() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("b.txt"), "second song.\n").unwrap();
		fs::write(dir.path().join("a.txt"), "first song").unwrap();
		fs::write(dir.path().join("notes.md"), "ignored").unwrap();
		fs::create_dir(dir.path().join("nested.txt")).unwrap();

		let files = list_files(dir.path(), CORPUS_EXTENSION).unwrap();
		assert_eq!(files, vec!["a.txt", "b.txt"]);

		let text = combine_files(dir.path(), &files).unwrap();
		assert_eq!(text, "first songsecond song.\n");
	}

	#[test]
	fn test_missing_folder() {
		assert!(list_files("/definitely/not/here", CORPUS_EXTENSION).is_err());
	}

	#[test]
	fn test_normalize_folder() {
		assert_eq!(normalize_folder(Path::new("lyrics")), PathBuf::from("lyrics"));
		assert!(normalize_folder(Path::new(".")).is_absolute());
	}
}
