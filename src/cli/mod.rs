pub mod context;
pub mod contact_commands;
pub mod event_commands;
pub mod book_commands;

use rusqlite::Connection;

use context::CLIContext;
use event_commands::LinkAction;

/// Run the interactive REPL on an open book.
pub fn run(conn: Connection) {
    println!("Blackbook");
    println!("Type 'help' for commands, 'exit' to quit.");
    println!();

    let ctx = CLIContext::new(conn);
    repl_loop(&ctx);
}

fn repl_loop(ctx: &CLIContext) {
    loop {
        let input = match ctx.read_line("> ") {
            Some(s) => s,
            None => break,
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, args) = parse_command(input);

        match command {
            "help" | "?" => print_help(),
            "quit" | "exit" | "q" => break,

            // Contacts
            "contacts" | "list" | "ls" => contact_commands::list(ctx),
            "add-contact" => contact_commands::add(ctx, args),
            "show-contact" | "show" => contact_commands::show(ctx, args),
            "edit-name" => contact_commands::edit_name(ctx, args),
            "add-phone" => contact_commands::add_phone(ctx, args),
            "add-email" => contact_commands::add_email(ctx, args),
            "set-position" => contact_commands::set_position(ctx, args),
            "add-interest" => contact_commands::add_interest(ctx, args),
            "remove-interest" => contact_commands::remove_interest(ctx, args),
            "delete-contact" => contact_commands::delete(ctx, args),

            // Events
            "events" => event_commands::list(ctx, args),
            "add-event" => event_commands::add(ctx, args),
            "show-event" => event_commands::show(ctx, args),
            "delete-event" => event_commands::delete(ctx, args),
            "link" => event_commands::link(ctx, args, LinkAction::Link),
            "unlink" => event_commands::link(ctx, args, LinkAction::Unlink),
            "toggle" => event_commands::link(ctx, args, LinkAction::Toggle),

            // Other
            "find" => book_commands::find(ctx, args),
            "import" => book_commands::import(ctx, args),
            "export" => book_commands::export(ctx, args),
            "stats" => book_commands::stats(ctx),

            _ => println!("Unknown command: {}. Type 'help' for commands.", command),
        }
    }
}

/// Split input into command and the rest of the line.
fn parse_command(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.find(|c: char| c == ' ' || c == '\t') {
        Some(pos) => (&input[..pos], input[pos..].trim()),
        None => (input, ""),
    }
}

fn print_help() {
    println!(r#"
COMMANDS:

  Contacts:
    contacts                  List all contacts
    add-contact [name]        Add a contact (interactive)
    show-contact <name>       Show contact details and events
    edit-name <name>          Change given/family name
    add-phone <name>          Add a phone number
    add-email <name>          Add an email address
    set-position <name>       Set how you know them
    add-interest <name>       Tag with an interest
    remove-interest <name>    Remove an interest
    delete-contact <name>     Delete a contact (events are kept)

  Events:
    events [all]              List upcoming (or all) events
    add-event [title]         Create an event (interactive)
    show-event <title>        Show event details and attendees
    delete-event <title>      Delete an event (contacts are kept)
    link <name>               Link a contact to an event
    unlink <name>             Remove a contact from an event
    toggle <name>             Flip a contact's link to an event

  Other:
    find <query>              Search contacts and events
    import <file.vcf>         Import contacts from vCard
    export <file>             Export to .vcf, or .json for a full snapshot
    stats                     Show counts
    help                      Show this help
    exit / quit / q           Exit

TIPS:
  - Names and titles are case-insensitive and partial matches work
  - Dates are YYYY-MM-DD or YYYY-MM-DD HH:MM in local time"#);
}
