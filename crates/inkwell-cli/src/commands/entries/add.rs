use crate::app::{read_new_passphrase, AppContext};
use crate::cli::AddArgs;
use crate::errors::with_hint;
use crate::helpers::{read_entry_body, read_title};

pub fn handle_add(ctx: &mut AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let interactive = ctx.interactive(args.no_input);
    let quiet = ctx.quiet();
    ctx.journal()?;

    let title = read_title(interactive, args.title.clone(), None)?;
    let body = read_entry_body(args.no_input, args.body.clone(), None)?;
    let passphrase = read_new_passphrase(interactive, quiet)?;

    let id = ctx
        .journal_mut()?
        .add_entry(&title, &body, &passphrase)
        .map_err(with_hint)?;

    if quiet {
        println!("{}", id);
    } else {
        println!("Added entry {}", id);
    }
    Ok(())
}
