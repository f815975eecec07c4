use anyhow::Context;
use colored::{ColoredString, Colorize};
use serde_json::json;
use tracing::debug;
use twig_json::{read_document, JsonOperation, JsonTree, JsonTreeConfig};
use twig_seq::{diff_sequences, EditStep};
use twig_tree::{DiffOptions, Operation, OperationSummary, TreeDiff};

use crate::cli::*;
use crate::render;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Tree(args) => cmd_tree(args, cli.format),
        Command::Seq(args) => cmd_seq(args, cli.format),
    }
}

fn adapter_config(args: &TreeArgs) -> anyhow::Result<JsonTreeConfig> {
    let mut config = match &args.config {
        Some(path) => JsonTreeConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => JsonTreeConfig::default(),
    };
    if let Some(field) = &args.id_field {
        config.id_field = field.clone();
    }
    if let Some(field) = &args.children_field {
        config.children_field = field.clone();
    }
    config.validate().context("checking field overrides")?;
    Ok(config)
}

fn cmd_tree(args: TreeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = adapter_config(&args)?;
    let old = read_document(&args.old).with_context(|| format!("reading {}", args.old.display()))?;
    let new = read_document(&args.new).with_context(|| format!("reading {}", args.new.display()))?;

    let options = DiffOptions {
        detect_moves: !args.no_moves,
        ..Default::default()
    };
    let diff = TreeDiff::with_options(&old, &new, JsonTree::new(config), options);
    let ops = diff.operations().context("diffing documents")?;
    let summary = OperationSummary::of(ops);
    debug!(
        old = %args.old.display(),
        new = %args.new.display(),
        operations = summary.total(),
        "tree diff complete"
    );

    match format {
        OutputFormat::Json => {
            let out = if args.show_tree {
                json!({ "operations": ops, "edit_tree": diff.edit_tree()? })
            } else {
                serde_json::to_value(ops)?
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            if args.show_tree {
                for line in render::tree_outline(diff.edit_tree()?) {
                    println!("{}", line.dimmed());
                }
                println!();
            }
            for op in ops {
                println!("{}", paint(op, render::operation_line(op)));
                if let Operation::ModifyProperty { detail, .. } = op {
                    for change in &detail.changes {
                        println!("    {}", render::field_line(change));
                    }
                }
            }
            let line = render::summary_line(&summary);
            if summary.is_empty() {
                println!("{}", line.green());
            } else {
                println!("{}", line.bold());
            }
        }
    }
    Ok(())
}

fn paint(op: &JsonOperation, line: String) -> ColoredString {
    match op {
        Operation::Add { .. } => line.green(),
        Operation::Remove { .. } => line.red(),
        Operation::Move { .. } => line.yellow(),
        Operation::Replace { .. } => line.cyan(),
        Operation::ModifyProperty { .. } => line.blue(),
    }
}

fn tokens(text: &str, split: Option<&str>) -> Vec<String> {
    match split {
        Some(sep) if !sep.is_empty() => text.split(sep).map(String::from).collect(),
        _ => text.chars().map(String::from).collect(),
    }
}

fn cmd_seq(args: SeqArgs, format: OutputFormat) -> anyhow::Result<()> {
    let old = tokens(&args.old, args.split.as_deref());
    let new = tokens(&args.new, args.split.as_deref());
    let steps = diff_sequences(&old, &new)?;
    let distance = steps.iter().filter(|s| s.is_change()).count();

    match format {
        OutputFormat::Json => {
            let out = json!({ "distance": distance, "steps": steps });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            for step in &steps {
                let line = render::step_line(step);
                let line = match step {
                    EditStep::Add { .. } => line.green(),
                    EditStep::Remove { .. } => line.red(),
                    EditStep::Replace { .. } => line.yellow(),
                    EditStep::Reserve { .. } => line.dimmed(),
                };
                println!("{line}");
            }
            println!("distance {}", distance.to_string().bold());
        }
    }
    Ok(())
}
