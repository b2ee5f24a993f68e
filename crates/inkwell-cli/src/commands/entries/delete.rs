use dialoguer::Confirm;
use inkwell_core::{EntryStore, InkwellError};

use crate::app::AppContext;
use crate::cli::DeleteArgs;
use crate::errors::{with_hint, CliError};
use crate::helpers::parse_entry_id;

pub fn handle_delete(ctx: &mut AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let id = parse_entry_id(&args.id)?;
    if ctx.journal()?.store().get(&id)?.is_none() {
        return Err(with_hint(InkwellError::NotFound(id)));
    }

    if !args.yes {
        if !ctx.interactive(false) {
            return Err(CliError::invalid_input(
                "Refusing to delete without confirmation; pass --yes to skip the prompt",
            )
            .into());
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete entry {}?", id))
            .default(false)
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))?;
        if !confirmed {
            if !ctx.quiet() {
                println!("Cancelled.");
            }
            return Ok(());
        }
    }

    ctx.journal_mut()?.delete_entry(&id).map_err(with_hint)?;
    if !ctx.quiet() {
        println!("Deleted entry {}", id);
    }
    Ok(())
}
