//! `cairn validate` - check structural invariants

use serde_json::json;

use crate::cli::format::output_by_format;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::print_json;
use cairn_core::error::{CairnError, Result};

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let curator = ctx.open_curator()?;
    let problems = curator.tree().validate();

    let printed: Result<()> = output_by_format!(ctx.cli.format,
        json => print_json(&json!({
            "valid": problems.is_empty(),
            "nodes": curator.tree().len(),
            "problems": problems,
        })),
        human => {
            for problem in &problems {
                println!("{}", problem);
            }
            if problems.is_empty() && !ctx.cli.quiet {
                println!("Tree is valid ({} nodes)", curator.tree().len());
            }
        }
    );
    printed?;

    if problems.is_empty() {
        Ok(())
    } else {
        Err(CairnError::InvalidTree {
            count: problems.len(),
        })
    }
}
