use chrono::Utc;

use inkwell_core::feedback::FeedbackCache;
use inkwell_core::storage::EntryFilter;

use crate::app::{read_passphrase, AppContext};
use crate::cli::ListArgs;
use crate::constants::DEFAULT_LIST_LIMIT;
use crate::errors::with_hint;
use crate::helpers::{parse_datetime, parse_duration, window_start};
use crate::output::{listing_json, print_listing, print_skipped_notice, FeedbackMap};

fn build_filter(args: &ListArgs) -> anyhow::Result<EntryFilter> {
    let mut filter = EntryFilter::new();
    if let Some(ref l) = args.last {
        let window = parse_duration(l)?;
        filter = filter.since(window_start(Utc::now(), window)?);
    }
    if let Some(ref s) = args.since {
        filter = filter.since(parse_datetime(s)?);
    }
    if let Some(ref u) = args.until {
        filter = filter.until(parse_datetime(u)?);
    }
    if let Some(lim) = args.limit {
        filter = filter.limit(lim);
    } else if args.last.is_none() && args.since.is_none() && args.until.is_none() {
        filter = filter.limit(DEFAULT_LIST_LIMIT);
    }
    Ok(filter)
}

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let filter = build_filter(args)?;
    let journal = ctx.journal()?;
    let passphrase = read_passphrase(ctx.interactive(args.no_input))?;

    let listing = journal
        .list_entries(&passphrase, &filter)
        .map_err(with_hint)?;

    let mut feedback = FeedbackMap::new();
    if args.feedback || ctx.settings()?.feedback.enabled {
        let provider = ctx.feedback_provider()?;
        let mut cache = FeedbackCache::new();
        for entry in &listing.entries {
            feedback.insert(entry.id, cache.get_or_request(provider, entry));
        }
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&listing_json(&listing, &feedback))?
        );
        print_skipped_notice(listing.skipped_count());
    } else {
        print_listing(&listing, &feedback, ctx.quiet());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CliError;

    fn args() -> ListArgs {
        ListArgs {
            last: None,
            since: None,
            until: None,
            limit: None,
            json: false,
            feedback: false,
            no_input: true,
        }
    }

    #[test]
    fn test_default_limit_without_window() {
        let filter = build_filter(&args()).unwrap();
        assert_eq!(filter.limit, Some(DEFAULT_LIST_LIMIT));
    }

    #[test]
    fn test_window_lifts_default_limit() {
        let mut list_args = args();
        list_args.last = Some("7d".to_string());
        let filter = build_filter(&list_args).unwrap();
        assert_eq!(filter.limit, None);
        assert!(filter.since.is_some());
    }

    #[test]
    fn test_huge_window_rejected_without_panic() {
        for last in ["999999999999999d", "100000000000d"] {
            let mut list_args = args();
            list_args.last = Some(last.to_string());
            let err = build_filter(&list_args).unwrap_err();
            assert!(err.downcast_ref::<CliError>().is_some(), "{}", last);
        }
    }

    #[test]
    fn test_invalid_since_rejected() {
        let mut list_args = args();
        list_args.since = Some("last tuesday".to_string());
        assert!(build_filter(&list_args).is_err());
    }
}
