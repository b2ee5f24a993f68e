use crate::app::{read_passphrase, AppContext};
use crate::cli::EditArgs;
use crate::errors::with_hint;
use crate::helpers::{parse_entry_id, read_entry_body, read_title};

pub fn handle_edit(ctx: &mut AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let id = parse_entry_id(&args.id)?;
    let interactive = ctx.interactive(args.no_input);
    let passphrase = read_passphrase(interactive)?;

    let current = ctx
        .journal()?
        .get_entry(&id, &passphrase)
        .map_err(with_hint)?;
    let title = read_title(interactive, args.title.clone(), Some(&current.title))?;
    let body = read_entry_body(args.no_input, args.body.clone(), Some(&current.content))?;

    if title == current.title && body == current.content {
        if !ctx.quiet() {
            println!("No changes.");
        }
        return Ok(());
    }

    ctx.journal_mut()?
        .update_entry(&id, &title, &body, &passphrase)
        .map_err(with_hint)?;

    if !ctx.quiet() {
        println!("Updated entry {}", id);
    }
    Ok(())
}
