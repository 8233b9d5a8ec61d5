//! `mapping-template`: write a starter attribute mapping file.

use std::path::Path;

use ipamsync_core::{Source, template_for};

use crate::cli::{GlobalOpts, MappingTemplateArgs};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &MappingTemplateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let template = template_for(args.source.map(Source::from));
    let json = serde_json::to_string_pretty(&template)?;

    if args.file == Path::new("-") {
        output::print_output(&json, false);
        return Ok(());
    }

    std::fs::write(&args.file, format!("{json}\n"))?;
    if !global.quiet {
        output::success(&format!(
            "Wrote {} mapping rule(s) to {}",
            template.mappings.len(),
            args.file.display()
        ));
    }
    Ok(())
}
