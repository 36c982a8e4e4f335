use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::commands::{base_name_from_layout, layout_file_name, resolve_session, scan_layout_file};
use crate::config::Session;
use crate::element::Element;
use crate::generator::{self, ExistingMembers, GenerationRequest};
use crate::inject::Target;

/// Generate the holder/model pair for a layout: to stdout, or spliced
/// into an existing Java class file with `--into`
pub fn execute(
    layout: &str,
    session: Option<&str>,
    into: Option<&str>,
    name: Option<&str>,
) -> Result<()> {
    let start = Instant::now();
    let layout_path = Path::new(layout);

    let mut elements = scan_layout_file(layout_path)?;
    if elements.is_empty() {
        anyhow::bail!("no IDs found in `{}`", layout);
    }

    let (session, _) = resolve_session(session)?;
    session.apply(&mut elements)?;

    let mut request = build_request(&session, layout_path, elements, name);
    let used = request.elements.iter().filter(|e| e.used).count();

    match into {
        None => {
            let source = generator::generate(&request)?;
            let holder = generator::assemble_holder(&source, &BTreeMap::new());
            print!("{}", holder);
            println!();
            print!("{}", source.model.source);
        }
        Some(target_file) => {
            if used == 0 {
                println!("   {} no injection was selected", "Skipped".yellow().bold());
                return Ok(());
            }

            let target_source = fs::read_to_string(target_file)
                .with_context(|| format!("failed to read `{}`", target_file))?;
            let target = Target::parse(&target_source)
                .map_err(|e| anyhow::anyhow!("cannot splice into `{}`: {}", target_file, e))?;

            let holder_name = request.holder_name();
            let model_name = request.model_name();
            let (existing, preserved) = target.existing_methods(&holder_name);
            request.existing = existing;

            let source = generator::generate(&request)?;
            let holder = generator::assemble_holder(&source, &preserved);
            let updated = target
                .splice(&holder_name, &model_name, &holder, &source.model.source)
                .map_err(|e| anyhow::anyhow!("cannot splice into `{}`: {}", target_file, e))?;
            fs::write(target_file, updated)
                .with_context(|| format!("failed to write `{}`", target_file))?;

            for method in &source.methods {
                if method.already_present {
                    println!(
                        "    keeping existing {}() (already has a body)",
                        method.kind.method_name()
                    );
                }
            }
            println!(
                "  {} `{}` into {} ({} injections) in {:.2}s",
                "Generated".green().bold(),
                holder_name,
                target_file,
                used,
                start.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}

fn build_request(
    session: &Session,
    layout_path: &Path,
    elements: Vec<Element>,
    name: Option<&str>,
) -> GenerationRequest {
    let base_name = name
        .map(|n| n.to_string())
        .or_else(|| session.holder.name.clone())
        .unwrap_or_else(|| base_name_from_layout(layout_path));

    GenerationRequest {
        base_name,
        layout_name: layout_file_name(layout_path),
        prefix: session.holder.prefix.clone(),
        elements,
        auto_implements: session.holder.auto_implements,
        strict_hints: session.holder.strict_hints,
        existing: ExistingMembers::default(),
    }
}
