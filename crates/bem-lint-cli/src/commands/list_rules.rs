//! List rules command implementation.

use bem_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<25} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<10} {:<25} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  recommended  - BEM001 (error), BEM002 (warning) (default)");
    println!("  strict       - BEM001, BEM002 as errors");
    println!("  minimal      - BEM001 only, without :is()/:where() arguments");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  bem-lint check --rules no-side-effects");
    println!("  bem-lint check --rules BEM001,BEM002");
}
