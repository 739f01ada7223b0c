//! Markdown persistence: one titled section per scraped page, separated by
//! horizontal rules, in listing order.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use crate::types::ScrapedPage;

pub fn write_markdown(path: &Path, entries: &[ScrapedPage], append: bool) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    if append {
        options.append(true);
    } else {
        options.truncate(true);
    }
    let mut file = options.open(path)?;

    for (idx, entry) in entries.iter().enumerate() {
        writeln!(file, "## {}\n", entry.url)?;
        writeln!(file, "{}\n", entry.text)?;
        if idx < entries.len() - 1 {
            writeln!(file, "---\n")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn pages() -> Vec<ScrapedPage> {
        vec![
            ScrapedPage {
                url: "https://one.example/a".into(),
                text: "first body".into(),
            },
            ScrapedPage {
                url: "https://two.example/b".into(),
                text: "second body".into(),
            },
        ]
    }

    #[test]
    fn writes_sections_with_rule_between() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.md");
        write_markdown(&path, &pages(), false).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "## https://one.example/a\n\nfirst body\n\n---\n\n## https://two.example/b\n\nsecond body\n\n"
        );
    }

    #[test]
    fn single_entry_has_no_trailing_rule() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.md");
        write_markdown(&path, &pages()[..1], false).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("---"));
        assert!(content.starts_with("## https://one.example/a"));
    }

    #[test]
    fn append_preserves_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.md");
        std::fs::write(&path, "existing\n").unwrap();

        write_markdown(&path, &pages()[..1], true).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("existing\n## https://one.example/a"));
    }

    #[test]
    fn overwrite_truncates_first() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.md");
        std::fs::write(&path, "stale data that is longer than the new output")
            .unwrap();

        write_markdown(&path, &pages()[..1], false).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("stale"));
    }
}
