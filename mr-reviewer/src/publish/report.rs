//! Markdown report: one `### heading` section per reviewed unit.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::errors::{Error, MrResult};
use crate::review::FileReview;

/// Renders sections `### {heading}\n{body}\n`, separated by a blank line.
pub fn render_report(reviews: &[FileReview]) -> String {
    reviews
        .iter()
        .map(|r| format!("### {}\n{}\n", r.heading(), r.body))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Writes the report to `{dir}/{iid}.md`, creating `dir` if needed.
/// An existing report for the same IID is replaced.
pub async fn write_report(dir: &Path, iid: u64, text: &str) -> MrResult<PathBuf> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::io(dir, e))?;

    let path = dir.join(format!("{iid}.md"));
    fs::write(&path, text)
        .await
        .map_err(|e| Error::io(&path, e))?;

    info!(path = %path.display(), bytes = text.len(), "report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(path: &str, chunk: Option<(usize, usize)>, body: &str) -> FileReview {
        FileReview {
            file_path: path.into(),
            chunk_index: chunk.map(|c| c.0),
            chunk_total: chunk.map(|c| c.1),
            body: body.into(),
        }
    }

    #[test]
    fn sections_are_joined_by_blank_line() {
        let text = render_report(&[
            review("a.py", None, "No issues found"),
            review("b.py", Some((1, 2)), "1. rename x"),
        ]);
        assert_eq!(
            text,
            "### a.py\nNo issues found\n\n\n### b.py (part 1/2)\n1. rename x\n"
        );
        assert_eq!(render_report(&[]), "");
    }

    #[tokio::test]
    async fn write_creates_nested_dir_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("out/nested");

        let p = write_report(&dir, 42, "first").await.unwrap();
        assert_eq!(p, dir.join("42.md"));
        write_report(&dir, 42, "second").await.unwrap();
        assert_eq!(std::fs::read_to_string(p).unwrap(), "second");
    }
}
