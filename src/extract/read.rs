use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Read an export file as text, replacing invalid UTF-8 sequences instead of
/// failing. Only genuine I/O faults are returned as errors.
pub fn read_export_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Split text into physical lines. `\r\n`, a lone `\r` and `\n` all end
/// a line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let s = rest?;
        match s.find(['\r', '\n']) {
            Some(i) => {
                let width = if s[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&s[i + width..]);
                Some(&s[..i])
            }
            None => {
                rest = None;
                Some(s)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn invalid_bytes_are_replaced() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        tmp.write_all(b"Caf\xe9\tBand\n")?;
        let text = read_export_text(tmp.path())?;
        assert_eq!(text, "Caf\u{FFFD}\tBand\n");
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_export_text("/definitely/not/here.txt").unwrap_err();
        assert!(err.to_string().contains("reading"));
    }

    #[test]
    fn crlf_is_stripped() {
        let lines: Vec<&str> = split_lines("a\tb\r\nc\n").collect();
        assert_eq!(lines, vec!["a\tb", "c", ""]);
    }

    #[test]
    fn bare_cr_ends_a_line() {
        let lines: Vec<&str> = split_lines("a\rb\r\rc\r\nd").collect();
        assert_eq!(lines, vec!["a", "b", "", "c", "d"]);
    }
}
