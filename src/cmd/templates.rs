//! Quick-start catalog listing for `autocoder templates`.

use anyhow::{Result, bail};
use autocoder::catalog::{self, TEMPLATES};
use console::style;

pub fn cmd_templates(name: Option<&str>) -> Result<()> {
    if let Some(name) = name {
        let Some(template) = catalog::find(name) else {
            bail!(
                "Unknown template '{}'. Available: {}",
                name,
                catalog::slugs().join(", ")
            );
        };
        println!("{}{}", template.icon, style(template.title).bold());
        println!("  {}", template.description);
        println!();
        println!("{}", template.idea);
        return Ok(());
    }

    println!();
    println!("Quick Start Templates");
    println!("=====================");
    println!();
    for template in TEMPLATES {
        println!(
            "  {}{:<18} {:<16} {}",
            template.icon,
            style(template.title).bold(),
            style(template.slug).cyan(),
            style(template.description).dim()
        );
    }
    println!();
    println!("Run one with: autocoder run --template <slug>");
    println!();
    Ok(())
}
