use inkwell_core::feedback::request_feedback;

use crate::app::{read_passphrase, AppContext};
use crate::cli::ShowArgs;
use crate::errors::with_hint;
use crate::helpers::parse_entry_id;
use crate::output::{entry_json, print_entry};

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let id = parse_entry_id(&args.id)?;
    let journal = ctx.journal()?;
    let passphrase = read_passphrase(ctx.interactive(args.no_input))?;

    let entry = journal.get_entry(&id, &passphrase).map_err(with_hint)?;

    let feedback = if args.feedback || ctx.settings()?.feedback.enabled {
        Some(request_feedback(ctx.feedback_provider()?, &entry))
    } else {
        None
    };

    if args.json {
        let output = serde_json::to_string_pretty(&entry_json(&entry, feedback.as_ref()))?;
        println!("{}", output);
    } else {
        print_entry(&entry, feedback.as_ref(), ctx.quiet());
    }
    Ok(())
}
