use std::path::Path;

use crate::cli::context::CLIContext;
use crate::display;
use crate::ops::*;
use crate::queries::*;

/// Searches contacts by name and interest, and events by title.
pub fn find(ctx: &CLIContext, args: &str) {
    let Some(query) = ctx.arg_or_prompt(args, "Search: ") else {
        return;
    };

    let mut contacts = contact_queries::find_by_name(&ctx.conn, &query).unwrap_or_default();
    for c in contact_queries::find_by_interest(&ctx.conn, &query).unwrap_or_default() {
        if !contacts.iter().any(|existing| existing.id == c.id) {
            contacts.push(c);
        }
    }
    let events = event_queries::find_by_title(&ctx.conn, &query).unwrap_or_default();

    if contacts.is_empty() && events.is_empty() {
        println!("Nothing matches '{}'.", query);
        return;
    }
    if !contacts.is_empty() {
        println!("Contacts:");
        for c in &contacts {
            println!("  {}", display::contact_name(c));
        }
    }
    if !events.is_empty() {
        println!("Events:");
        for e in &events {
            println!("  {}", display::event_summary(e, &chrono::Local));
        }
    }
}

pub fn import(ctx: &CLIContext, args: &str) {
    let Some(path) = ctx.arg_or_prompt(args, "vCard file: ") else {
        return;
    };

    match import_ops::import_vcf_file(&ctx.conn, Path::new(&path)) {
        Ok(stats) => print_import_stats(&stats),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn print_import_stats(stats: &import_ops::ImportStats) {
    println!("Imported {} new, updated {}.", stats.imported, stats.updated);
    if stats.failed > 0 {
        println!("{} card(s) could not be read:", stats.failed);
        for err in &stats.errors {
            println!("  {}", err);
        }
    }
}

/// `.json` writes a full snapshot; anything else writes vCards.
pub fn export(ctx: &CLIContext, args: &str) {
    let Some(path) = ctx.arg_or_prompt(args, "Export to: ") else {
        return;
    };
    let path = Path::new(&path);

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let result = if is_json {
        export_ops::export_json(&ctx.conn)
            .and_then(|json| std::fs::write(path, json).map_err(Into::into))
            .map(|_| "snapshot".to_string())
    } else {
        export_ops::export_vcf_file(&ctx.conn, path).map(|n| format!("{} contact(s)", n))
    };

    match result {
        Ok(what) => println!("Wrote {} to {}", what, path.display()),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn stats(ctx: &CLIContext) {
    match stats_queries::book_stats(&ctx.conn) {
        Ok(s) => {
            println!("Contacts: {}", s.contacts);
            println!("Events: {}", s.events);
            println!("Links: {}", s.links);
            if s.decode_failures > 0 {
                println!("Unreadable stored values this session: {}", s.decode_failures);
            }
        }
        Err(e) => ctx.print_error(&e),
    }
}
