use chrono::Local;

use crate::cli::context::CLIContext;
use crate::display;
use crate::model::*;
use crate::ops::*;
use crate::queries::*;

pub fn list(ctx: &CLIContext) {
    let contacts = contact_queries::all_contacts(&ctx.conn).unwrap_or_default();
    if contacts.is_empty() {
        println!("Your book is empty. Use 'add-contact' to add someone.");
        return;
    }

    println!("Contacts ({}):", contacts.len());
    println!();
    for contact in &contacts {
        let position = match contact.position {
            Position::Unknown => String::new(),
            p => format!(" [{}]", p.display_name()),
        };
        let email = contact
            .payload
            .primary_email()
            .map(|e| format!(" - {}", e))
            .unwrap_or_default();
        println!("  {}{}{}", display::contact_name(contact), position, email);
    }
}

pub fn add(ctx: &CLIContext, args: &str) {
    let (given, family) = if args.is_empty() {
        let given = match ctx.prompt("Given name: ") {
            Some(s) => s,
            None => return,
        };
        let family = match ctx.prompt("Family name: ") {
            Some(s) => s,
            None => return,
        };
        (given, family)
    } else {
        match args.rsplit_once(' ') {
            Some((given, family)) => (given.to_string(), family.to_string()),
            None => (args.to_string(), String::new()),
        }
    };

    let mut payload = ContactPayload::named(&given, &family);
    if let Some(email) = ctx.prompt("Email (Enter to skip): ").filter(|s| !s.is_empty()) {
        payload = payload.with_email(&email, None);
    }
    if let Some(phone) = ctx.prompt("Phone (Enter to skip): ").filter(|s| !s.is_empty()) {
        payload = payload.with_phone(&phone, None);
    }

    match contact_ops::add_contact(&ctx.conn, payload) {
        Ok(c) => println!("Added {}", display::contact_name(&c)),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn show(ctx: &CLIContext, args: &str) {
    let Some(contact) = ctx.find_contact(args) else {
        return;
    };
    let p = &contact.payload;

    println!();
    println!("{}", display::contact_name(&contact));
    if !p.nickname.is_empty() {
        println!("  Nickname: {}", p.nickname);
    }
    if !p.organization.is_empty() || !p.job_title.is_empty() {
        println!("  Work: {} {}", p.job_title, p.organization);
    }
    println!("  Position: {}", contact.position.display_name());
    for phone in &p.phones {
        println!("  Phone: {}{}", phone.value, label_suffix(&phone.label));
    }
    for email in &p.emails {
        println!("  Email: {}{}", email.value, label_suffix(&email.label));
    }
    for adr in &p.addresses {
        println!("  Address: {}{}", adr.value.one_line(), label_suffix(&adr.label));
    }
    if let Some(bday) = p.birthday {
        println!("  Birthday: {}", bday.format("%B %-d, %Y"));
    }
    let interests = display::interest_summary(&contact);
    if !interests.is_empty() {
        println!("  Interests: {}", interests);
    }
    if !p.note.is_empty() {
        println!("  Note: {}", p.note);
    }

    let events = contact_queries::events_for_contact(&ctx.conn, contact.id).unwrap_or_default();
    println!();
    if events.is_empty() {
        println!("  No events");
    } else {
        println!("  Events:");
        for e in &events {
            println!("    {}", display::event_summary(e, &Local));
        }
    }
}

pub fn edit_name(ctx: &CLIContext, args: &str) {
    let Some(contact) = ctx.find_contact(args) else {
        return;
    };
    let given = ctx
        .prompt(&format!("Given name [{}]: ", contact.payload.given_name))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| contact.payload.given_name.clone());
    let family = ctx
        .prompt(&format!("Family name [{}]: ", contact.payload.family_name))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| contact.payload.family_name.clone());

    match contact_ops::rename(&ctx.conn, contact.id, &given, &family) {
        Ok(c) => println!("Renamed to {}", display::contact_name(&c)),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn add_phone(ctx: &CLIContext, args: &str) {
    let Some(contact) = ctx.find_contact(args) else {
        return;
    };
    let Some(number) = ctx.prompt("Phone number: ") else {
        return;
    };
    let label = ctx.prompt("Label (e.g. mobile, work): ");

    match contact_ops::add_phone(&ctx.conn, contact.id, &number, label.as_deref()) {
        Ok(_) => println!("Phone added."),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn add_email(ctx: &CLIContext, args: &str) {
    let Some(contact) = ctx.find_contact(args) else {
        return;
    };
    let Some(email) = ctx.prompt("Email: ") else {
        return;
    };
    let label = ctx.prompt("Label (e.g. home, work): ");

    match contact_ops::add_email(&ctx.conn, contact.id, &email, label.as_deref()) {
        Ok(_) => println!("Email added."),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn set_position(ctx: &CLIContext, args: &str) {
    let Some(contact) = ctx.find_contact(args) else {
        return;
    };

    println!("Positions:");
    for (i, p) in Position::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, p.display_name());
    }
    let Some(choice) = ctx.prompt("Choose a number: ") else {
        return;
    };
    let position = match choice.parse::<usize>() {
        Ok(n) if (1..=Position::ALL.len()).contains(&n) => Position::ALL[n - 1],
        _ => {
            println!("Invalid choice.");
            return;
        }
    };

    match contact_ops::set_position(&ctx.conn, contact.id, position) {
        Ok(c) => println!(
            "{} is now: {}",
            display::contact_name(&c),
            c.position.display_name()
        ),
        Err(e) => ctx.print_error(&e),
    }
}

/// Known interest names become predefined tags; anything else is custom.
pub fn add_interest(ctx: &CLIContext, args: &str) {
    let Some(contact) = ctx.find_contact(args) else {
        return;
    };
    let Some(text) = ctx.prompt("Interest: ") else {
        return;
    };

    match contact_ops::add_interest(&ctx.conn, contact.id, &text) {
        Ok(true) => println!("Interest added."),
        Ok(false) => println!("Nothing to add (blank or already present)."),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn remove_interest(ctx: &CLIContext, args: &str) {
    let Some(contact) = ctx.find_contact(args) else {
        return;
    };
    let labels = contact.interest_labels();
    if labels.is_empty() {
        println!("No interests to remove.");
        return;
    }
    println!("Interests: {}", labels.join(", "));
    let Some(text) = ctx.prompt("Remove which: ") else {
        return;
    };

    match contact_ops::remove_interest(&ctx.conn, contact.id, &text) {
        Ok(true) => println!("Interest removed."),
        Ok(false) => println!("No such interest."),
        Err(e) => ctx.print_error(&e),
    }
}

pub fn delete(ctx: &CLIContext, args: &str) {
    let Some(contact) = ctx.find_contact(args) else {
        return;
    };
    let name = display::contact_name(&contact);
    if !ctx.confirm(&format!("Delete {}? Linked events are kept. (y/n): ", name)) {
        return;
    }

    match contact_ops::delete_contact(&ctx.conn, contact.id) {
        Ok(events) if events.is_empty() => println!("Deleted {}.", name),
        Ok(events) => println!("Deleted {} and removed them from {} event(s).", name, events.len()),
        Err(e) => ctx.print_error(&e),
    }
}

fn label_suffix(label: &Option<String>) -> String {
    label
        .as_ref()
        .map(|l| format!(" ({})", l))
        .unwrap_or_default()
}
