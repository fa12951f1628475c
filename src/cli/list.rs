//! `list` and `generate-config` command handlers.

use super::exit_codes;
use crate::config::generate_example_config;
use crate::scorer::{Category, CheckRegistry};
use anyhow::Result;

/// Print the registered checks, optionally restricted to some categories
pub fn run_list(categories: &[String], json: bool) -> Result<i32> {
    let categories: Vec<Category> = categories
        .iter()
        .map(|c| c.parse())
        .collect::<crate::Result<_>>()?;
    println!("{}", render_list(CheckRegistry::builtin(), &categories, json)?);
    Ok(exit_codes::SUCCESS)
}

/// Print an example config enabling every registered check
pub fn run_generate_config() -> Result<i32> {
    print!("{}", generate_example_config());
    Ok(exit_codes::SUCCESS)
}

fn render_list(registry: &CheckRegistry, only: &[Category], json: bool) -> Result<String> {
    let selected: Vec<Category> = registry
        .categories()
        .into_iter()
        .filter(|c| only.is_empty() || only.contains(c))
        .collect();

    if json {
        let entries: Vec<serde_json::Value> = selected
            .iter()
            .flat_map(|cat| {
                registry.in_category(*cat).map(|check| {
                    serde_json::json!({
                        "category": cat.name(),
                        "key": check.key,
                        "description": check.description,
                        "pass_fail": check.is_pass_fail(),
                    })
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&entries)?);
    }

    let mut lines = Vec::new();
    for cat in selected {
        lines.push(format!("{} - {}", cat.name(), cat.description()));
        for check in registry.in_category(cat) {
            lines.push(format!("  {:<36} {}", check.key, check.description));
        }
        lines.push(String::new());
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_list_filters_categories() {
        let text = render_list(CheckRegistry::builtin(), &[Category::Sharing], false).unwrap();
        assert!(text.contains("sbom_sharable"));
        assert!(!text.contains("comp_with_name"));
    }

    #[test]
    fn test_render_list_json_is_flat() {
        let text = render_list(CheckRegistry::builtin(), &[Category::Structural], true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(4));
    }
}
