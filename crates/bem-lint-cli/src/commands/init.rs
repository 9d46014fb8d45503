//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# bem-lint configuration
#
# bem-lint reads stylesheet AST dumps (*.ast.json) written by a CSS parser,
# for example postcss: { "file": "...", "source": "...", "root": root.toJSON() }

# Preset: "recommended" (default), "strict" or "minimal"
preset = "recommended"

# Lowest severity that makes `bem-lint check` exit with status 1
fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./build/ast"

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/vendor/**",
]

# Separators between block, element, modifier and modifier value
[separators]
element = "__"
modifier = "--"
modifier_value = "--"

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.no-side-effects]
enabled = true
# severity = "warning"  # Override default severity
# Selectors matching these regular expressions are never reported
ignore = []
check_pseudo_arguments = true

[rules.no-chained-entities]
enabled = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("bem-lint.toml"), force)?;

    println!("Created bem-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit bem-lint.toml to configure rules");
    println!("  2. Dump your stylesheets to *.ast.json");
    println!("  3. Run: bem-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bem_lint_core::Config;
    use tempfile::TempDir;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert!(config.is_rule_enabled("no-side-effects"));
        assert!(bem_lint_rules::configured_rules(&config).is_ok());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bem-lint.toml");
        std::fs::write(&path, "# mine").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
