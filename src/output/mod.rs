//! Output module for rendering crawl results
//!
//! This module handles:
//! - Building the topic tree from the recorded edges
//! - Rendering the markdown digest
//! - Crawl statistics

mod markdown;
pub mod stats;
mod tree;

pub use markdown::{
    ranked_children, render_digest, render_tree, root_block, subtopic_block, subtopic_blocks,
    RenderContext, INTRODUCTION_UNAVAILABLE, ROOT_NOT_FOUND,
};
pub use stats::{print_statistics, CrawlStatistics};
pub use tree::{build_tree, ContentNode};

use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a rendered digest to a file
///
/// # Arguments
///
/// * `digest` - The rendered markdown
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the digest
/// * `Err(std::io::Error)` - Failed to create or write the file
pub fn write_digest(digest: &str, output_path: &Path) -> std::io::Result<()> {
    let mut file = File::create(output_path)?;
    file.write_all(digest.as_bytes())?;
    if !digest.ends_with('\n') {
        file.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_digest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("digest.md");

        write_digest("# Graph theory", &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "# Graph theory\n");
    }

    #[test]
    fn test_write_digest_to_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("digest.md");
        assert!(write_digest("x", &path).is_err());
    }
}
