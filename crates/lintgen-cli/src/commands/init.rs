//! Init command implementation.

use std::path::Path;

use anyhow::{bail, Context, Result};

const STARTER_RULES: &str = r"# lintgen rules file
# One human-readable rule per line. Blank lines, # comments, and markdown
# headings are ignored.

Use === instead of ==
No console.log statements allowed
- Do NOT hardcode anything
Avoid Math.random()
";

const DEFAULT_GITIGNORE: &str = r"# Secrets
.env

# Dependencies
node_modules/

# Editors
.vscode/
.idea/
*.swp
";

/// Runs the init command in the current directory.
pub fn run(force: bool) -> Result<()> {
    run_in(Path::new("."), force)?;

    println!("Created .cursorrules");
    println!("\nNext steps:");
    println!("  1. Edit .cursorrules with your project's rules");
    println!("  2. Run: lintgen generate");

    Ok(())
}

/// Writes the starter rules file and ensures `.gitignore` covers `.env`.
fn run_in(dir: &Path, force: bool) -> Result<()> {
    let rules_path = dir.join(".cursorrules");

    if rules_path.exists() && !force {
        bail!(
            "Rules file already exists at {}. Use --force to overwrite.",
            rules_path.display()
        );
    }

    std::fs::write(&rules_path, STARTER_RULES)
        .with_context(|| format!("Failed to write {}", rules_path.display()))?;

    ensure_gitignore(dir)?;

    Ok(())
}

/// Creates `.gitignore` when missing, or appends a `.env` entry to an
/// existing one that lacks it. Secrets must never end up in version control
/// because the rules workflow runs with an API key nearby.
fn ensure_gitignore(dir: &Path) -> Result<()> {
    let path = dir.join(".gitignore");

    if !path.exists() {
        std::fs::write(&path, DEFAULT_GITIGNORE)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
        return Ok(());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if content.lines().any(|line| line.trim() == ".env") {
        return Ok(());
    }

    tracing::info!("Adding .env to existing {}", path.display());
    let mut updated = content;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str("\n# Secrets\n.env\n");
    std::fs::write(&path, updated)
        .with_context(|| format!("Failed to update {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_rules_file_and_gitignore() {
        let tmp = TempDir::new().unwrap();
        run_in(tmp.path(), false).unwrap();

        let rules = std::fs::read_to_string(tmp.path().join(".cursorrules")).unwrap();
        assert!(rules.contains("Use === instead of =="));

        let gitignore = std::fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        assert!(gitignore.lines().any(|l| l.trim() == ".env"));
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(".cursorrules"), "custom").unwrap();

        let err = run_in(tmp.path(), false).unwrap_err();
        assert!(err.to_string().contains("--force"));

        run_in(tmp.path(), true).unwrap();
        let rules = std::fs::read_to_string(tmp.path().join(".cursorrules")).unwrap();
        assert!(rules.contains("lintgen rules file"));
    }

    #[test]
    fn existing_gitignore_gains_env_entry_once() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(".gitignore"), "node_modules/").unwrap();

        run_in(tmp.path(), false).unwrap();
        let first = std::fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        assert!(first.contains("node_modules/"));
        assert!(first.lines().any(|l| l.trim() == ".env"));

        run_in(tmp.path(), true).unwrap();
        let second = std::fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        assert_eq!(first, second);
    }
}
