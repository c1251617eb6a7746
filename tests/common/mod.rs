#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

/// Archives (`<timestamp>.log` and compressed forms) in `dir`, sorted by name.
pub fn archives(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            let name = path.file_name().unwrap().to_string_lossy();
            name.starts_with(|c: char| c.is_ascii_digit()) && name.ends_with(extension)
        })
        .collect();
    found.sort();
    found
}

/// A message that makes a 100-byte line with the `[Info]  ` prefix and no
/// decorations.
pub fn hundred_byte_message(index: usize) -> String {
    let head = format!("line {index:03} ");
    format!("{head}{}", "x".repeat(91 - head.len()))
}
