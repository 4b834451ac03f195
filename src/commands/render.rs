//! `cairn render` - print the briefing

use serde_json::json;

use crate::cli::format::output_by_format;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::print_json;
use cairn_core::error::Result;
use cairn_core::render::{render, RenderOptions};

pub fn execute(ctx: &CommandContext, tokens: Option<usize>) -> Result<()> {
    let curator = ctx.open_curator()?;
    let config = &curator.config().render;
    let options = match tokens {
        Some(tokens) => {
            RenderOptions::from_tokens(tokens, config.chars_per_token).with_header(&config.header)
        }
        None => curator.config().render_options(),
    };

    let briefing = render(curator.tree(), &options);

    output_by_format!(ctx.cli.format,
        json => print_json(&json!({
            "text": briefing.text,
            "bytes": briefing.text.len(),
            "budget": options.max_chars,
            "omitted": briefing.omitted,
        })),
        human => {
            print!("{}", briefing.text);
        }
    )
}
