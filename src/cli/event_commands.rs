use chrono::{Local, Utc};

use crate::cli::context::CLIContext;
use crate::display;
use crate::ops::*;
use crate::queries::*;

pub fn list(ctx: &CLIContext, args: &str) {
    let events = if args.trim() == "all" {
        event_queries::all_events(&ctx.conn)
    } else {
        event_queries::upcoming(&ctx.conn, Utc::now(), 50)
    }
    .unwrap_or_default();

    if events.is_empty() {
        println!("No events. Use 'add-event' to create one, or 'events all' for past ones.");
        return;
    }

    for event in &events {
        let people = event_queries::contacts_for_event(&ctx.conn, event.id).unwrap_or_default();
        let with = if people.is_empty() {
            String::new()
        } else {
            let names: Vec<String> = people.iter().map(display::contact_name).collect();
            format!(" with {}", names.join(", "))
        };
        println!("  {}{}", display::event_summary(event, &Local), with);
    }
}

pub fn add(ctx: &CLIContext, args: &str) {
    let Some(title) = ctx.arg_or_prompt(args, "Title: ") else {
        println!("Title is required.");
        return;
    };

    let Some(start_input) = ctx.prompt("Starts (YYYY-MM-DD [HH:MM]): ") else {
        return;
    };
    let Some(start) = CLIContext::parse_when(&start_input) else {
        println!("Invalid date.");
        return;
    };

    let end = match ctx.prompt("Ends (Enter to skip): ") {
        Some(s) if !s.is_empty() => match CLIContext::parse_when(&s) {
            Some(w) => Some(w.at),
            None => {
                println!("Invalid date.");
                return;
            }
        },
        Some(_) => None,
        None => return,
    };
    let location = ctx.prompt("Location (Enter to skip): ");
    let notes = ctx.prompt("Notes (Enter to skip): ");

    match event_ops::add_event(
        &ctx.conn,
        &title,
        start.at,
        end,
        start.date_only,
        notes.as_deref(),
        location.as_deref(),
    ) {
        Ok(e) => println!("Added {}", display::event_summary(&e, &Local)),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn show(ctx: &CLIContext, args: &str) {
    let Some(event) = ctx.find_event(args) else {
        return;
    };

    println!();
    println!("{}", event.title);
    println!("  When: {}", display::format_date_range(&event, &Local));
    if let Some(loc) = &event.location {
        println!("  Where: {}", loc);
    }
    if let Some(notes) = &event.notes {
        println!("  Notes: {}", notes);
    }

    let people = event_queries::contacts_for_event(&ctx.conn, event.id).unwrap_or_default();
    if people.is_empty() {
        println!("  No contacts linked");
    } else {
        println!("  With:");
        for c in &people {
            println!("    {}", display::contact_name(c));
        }
    }
}

pub fn delete(ctx: &CLIContext, args: &str) {
    let Some(event) = ctx.find_event(args) else {
        return;
    };
    if !ctx.confirm(&format!("Delete '{}'? Linked contacts are kept. (y/n): ", event.title)) {
        return;
    }

    match event_ops::delete_event(&ctx.conn, event.id) {
        Ok(_) => println!("Deleted '{}'.", event.title),
        Err(e) => ctx.print_error(&e),
    }
}

#[derive(Clone, Copy)]
pub enum LinkAction {
    Link,
    Unlink,
    Toggle,
}

pub fn link(ctx: &CLIContext, args: &str, action: LinkAction) {
    let Some(contact_query) = ctx.arg_or_prompt(args, "Contact: ") else {
        return;
    };
    let Some(contact) = ctx.find_contact(&contact_query) else {
        return;
    };
    let Some(event_query) = ctx.prompt("Event: ") else {
        return;
    };
    let Some(event) = ctx.find_event(&event_query) else {
        return;
    };

    let name = display::contact_name(&contact);
    let result = match action {
        LinkAction::Link => link_ops::link_event(&ctx.conn, contact.id, event.id).map(|_| true),
        LinkAction::Unlink => {
            link_ops::unlink_event(&ctx.conn, contact.id, event.id).map(|_| false)
        }
        LinkAction::Toggle => link_ops::toggle_link(&ctx.conn, contact.id, event.id),
    };

    match result {
        Ok(true) => println!("{} is linked to '{}'.", name, event.title),
        Ok(false) => println!("{} is not linked to '{}'.", name, event.title),
        Err(e) => ctx.print_error(&e),
    }
}
