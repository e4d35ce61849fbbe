use chrono::{NaiveDate, NaiveTime, Weekday};
use shiftboard::{
    CandidateSlot, EventTemplate, RecurrenceKind, RecurrencePattern, StorePlan, TaskRecord,
    WorkingHours, load_plan_from_csv, load_plan_from_json, save_plan_to_csv, save_plan_to_json,
};
use std::io::{self, Write};
use std::str::FromStr;

fn parse_date(s: &str) -> Option<NaiveDate> {
    s.parse::<NaiveDate>().ok()
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

fn parse_members(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "mon" => Some(Weekday::Mon),
        "tue" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Parse `daily`, `weekly`, `custom:mon,wed`, ... into a pattern anchored at
/// the given date.
fn parse_recurrence(rule: &str, anchor: NaiveDate) -> Option<RecurrencePattern> {
    let (kind_str, days) = match rule.split_once(':') {
        Some((kind, days)) => (kind, Some(days)),
        None => (rule, None),
    };
    let kind = RecurrenceKind::from_str(kind_str).ok()?;
    let pattern = match kind {
        RecurrenceKind::None => RecurrencePattern::once(anchor),
        RecurrenceKind::Daily => RecurrencePattern::daily(anchor),
        RecurrenceKind::Weekly => RecurrencePattern::weekly(anchor),
        RecurrenceKind::Weekdays => RecurrencePattern::weekdays(anchor),
        RecurrenceKind::Custom => {
            let days = days?;
            let weekdays = days
                .split(',')
                .map(parse_weekday)
                .collect::<Option<Vec<_>>>()?;
            RecurrencePattern::custom(anchor, weekdays)
        }
    };
    Some(pattern.with_window(anchor, None))
}

fn render_tasks_table(tasks: &[TaskRecord]) -> String {
    let headers = [
        "id", "title", "date", "start", "end", "duration", "packages", "crew", "done", "pinned",
        "template",
    ];
    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|task| {
            vec![
                task.id.to_string(),
                task.title.clone(),
                task.date.to_string(),
                task.start_time.format("%H:%M").to_string(),
                task.end_time.format("%H:%M").to_string(),
                task.duration_label.clone(),
                task.packages.to_string(),
                task.crew.join(","),
                task.is_completed.to_string(),
                task.is_pinned.to_string(),
                task.template_id.map(|id| id.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    render_text_table(&headers, &rows)
}

fn render_templates_table(templates: &[EventTemplate]) -> String {
    let headers = ["id", "title", "start", "minutes", "packages", "kind", "active"];
    let rows: Vec<Vec<String>> = templates
        .iter()
        .map(|template| {
            vec![
                template.id.to_string(),
                template.title.clone(),
                template.start_time.format("%H:%M").to_string(),
                template.duration_minutes.to_string(),
                template.packages.to_string(),
                template.recurrence.kind.as_str().to_string(),
                template.recurrence.is_active.to_string(),
            ]
        })
        .collect();
    render_text_table(&headers, &rows)
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    out.push('|');
    for (i, name) in headers.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.len();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for row in rows {
        out.push('|');
        for (ci, cell) in row.iter().enumerate() {
            out.push(' ');
            out.push_str(cell);
            let pad = widths[ci].saturating_sub(cell.len());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the task board\n  templates                          List event templates\n  template add <id> <kind[:days]> <anchor> <HH:MM> <minutes> <packages> <title...>\n                                     Upsert a template (kind: none|daily|weekly|weekdays|custom:mon,wed)\n  template del <id>                  Delete a template (tasks keep their history)\n  task add <YYYY-MM-DD> <HH:MM> <seconds> <packages> <title...>\n                                     Create an ad-hoc task\n  task del <id>                      Delete a task\n  crew <id> <a,b,c>                  Assign crew members (conflict-checked)\n  complete <id>                      Mark a task completed\n  pin <id>                           Pin a task\n  hours show                         Show working hours\n  hours set <HH:MM> <HH:MM>          Configure store working hours\n  hours clear                        Remove working hours (permissive)\n  expand <tid> <date> [end]          Materialize a template for a date or range\n  next <tid> <from> <horizon_days>   First firing date on/after a date\n  conflicts <date> <HH:MM> <HH:MM> <a,b,c>\n                                     Who is busy in that slot\n  save <json|csv> <path>             Persist plan to disk\n  load <json|csv> <path>             Load plan from disk\n  quit|exit                          Exit"
    );
}

fn print_hours(plan: &StorePlan) {
    match plan.working_hours() {
        Some(hours) => println!(
            "Working hours: {} - {} (active: {})",
            hours.start_time.format("%H:%M"),
            hours.end_time.format("%H:%M"),
            hours.is_active
        ),
        None => println!("No working hours configured; every range is accepted."),
    }
}

fn main() {
    let mut plan = StorePlan::new();

    println!("Shiftboard (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        if stdin.read_line(&mut line).is_err() {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match command {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print!("{}", render_tasks_table(plan.tasks())),
            "templates" => print!("{}", render_templates_table(plan.templates())),
            "template" => match args.as_slice() {
                ["add", id, kind, anchor, start, minutes, packages, title @ ..]
                    if !title.is_empty() =>
                {
                    let parsed = (
                        id.parse::<i32>().ok(),
                        parse_date(anchor),
                        parse_time(start),
                        minutes.parse::<u32>().ok(),
                        packages.parse::<u32>().ok(),
                    );
                    let (Some(id), Some(anchor), Some(start), Some(minutes), Some(packages)) =
                        parsed
                    else {
                        println!("Error: could not parse template arguments.");
                        continue;
                    };
                    let Some(recurrence) = parse_recurrence(kind, anchor) else {
                        println!("Error: unknown recurrence '{kind}'.");
                        continue;
                    };
                    let template = EventTemplate::new(
                        id,
                        title.join(" "),
                        start,
                        minutes,
                        packages,
                        recurrence,
                    );
                    match plan.upsert_template(template) {
                        Ok(()) => println!("Template {id} saved."),
                        Err(err) => println!("Error: {err}"),
                    }
                }
                ["del", id] => match id.parse::<i32>() {
                    Ok(id) => {
                        if plan.delete_template(id) {
                            println!("Deleted template {id}.");
                        } else {
                            println!("Error: template {id} not found");
                        }
                    }
                    Err(_) => println!("Error: bad template id."),
                },
                _ => println!("Usage: template add ... | template del <id>"),
            },
            "task" => match args.as_slice() {
                ["add", date, start, seconds, packages, title @ ..] if !title.is_empty() => {
                    let parsed = (
                        parse_date(date),
                        parse_time(start),
                        seconds.parse::<u32>().ok(),
                        packages.parse::<u32>().ok(),
                    );
                    let (Some(date), Some(start), Some(seconds), Some(packages)) = parsed else {
                        println!("Error: could not parse task arguments.");
                        continue;
                    };
                    match plan.create_task(title.join(" "), date, start, seconds, packages) {
                        Ok(id) => println!("Created task {id}."),
                        Err(err) => println!("Error: {err}"),
                    }
                }
                ["del", id] => match id.parse::<i32>() {
                    Ok(id) => {
                        if plan.delete_task(id) {
                            println!("Deleted task {id}.");
                        } else {
                            println!("Error: task {id} not found");
                        }
                    }
                    Err(_) => println!("Error: bad task id."),
                },
                _ => println!("Usage: task add ... | task del <id>"),
            },
            "crew" => match args.as_slice() {
                [id, members] => {
                    let Ok(id) = id.parse::<i32>() else {
                        println!("Error: bad task id.");
                        continue;
                    };
                    match plan.set_crew(id, parse_members(members)) {
                        Ok(()) => println!("Crew set for task {id}."),
                        Err(err) => println!("Error: {err}"),
                    }
                }
                _ => println!("Usage: crew <id> <a,b,c>"),
            },
            "complete" => match args.as_slice() {
                [id] => match id.parse::<i32>() {
                    Ok(id) => match plan.set_completed(id, true) {
                        Ok(()) => println!("Task {id} completed."),
                        Err(err) => println!("Error: {err}"),
                    },
                    Err(_) => println!("Error: bad task id."),
                },
                _ => println!("Usage: complete <id>"),
            },
            "pin" => match args.as_slice() {
                [id] => match id.parse::<i32>() {
                    Ok(id) => match plan.set_pinned(id, true) {
                        Ok(()) => println!("Task {id} pinned."),
                        Err(err) => println!("Error: {err}"),
                    },
                    Err(_) => println!("Error: bad task id."),
                },
                _ => println!("Usage: pin <id>"),
            },
            "hours" => match args.as_slice() {
                ["show"] => print_hours(&plan),
                ["set", start, end] => {
                    let (Some(start), Some(end)) = (parse_time(start), parse_time(end)) else {
                        println!("Error: could not parse times.");
                        continue;
                    };
                    match WorkingHours::new(start, end) {
                        Ok(hours) => match plan.set_working_hours(hours) {
                            Ok(()) => println!("Working hours set."),
                            Err(err) => println!("Error: {err}"),
                        },
                        Err(err) => println!("Error: {err}"),
                    }
                }
                ["clear"] => {
                    plan.clear_working_hours();
                    println!("Working hours cleared.");
                }
                _ => println!("Usage: hours show | hours set <HH:MM> <HH:MM> | hours clear"),
            },
            "expand" => match args.as_slice() {
                [tid, date] => {
                    let (Ok(tid), Some(date)) = (tid.parse::<i32>(), parse_date(date)) else {
                        println!("Error: could not parse expand arguments.");
                        continue;
                    };
                    match plan.expand_for_date(tid, date) {
                        Ok(Some(task)) => println!("Generated task {}.", task.id),
                        Ok(None) => println!("Nothing to generate."),
                        Err(err) => println!("Error: {err}"),
                    }
                }
                [tid, start, end] => {
                    let parsed = (tid.parse::<i32>().ok(), parse_date(start), parse_date(end));
                    let (Some(tid), Some(start), Some(end)) = parsed else {
                        println!("Error: could not parse expand arguments.");
                        continue;
                    };
                    match plan.expand_for_range(tid, start, end) {
                        Ok(summary) => println!("Expansion: {}", summary.to_cli_summary()),
                        Err(err) => println!("Error: {err}"),
                    }
                }
                _ => println!("Usage: expand <tid> <date> [end]"),
            },
            "next" => match args.as_slice() {
                [tid, from, horizon] => {
                    let parsed = (
                        tid.parse::<i32>().ok(),
                        parse_date(from),
                        horizon.parse::<u32>().ok(),
                    );
                    let (Some(tid), Some(from), Some(horizon)) = parsed else {
                        println!("Error: could not parse next arguments.");
                        continue;
                    };
                    match plan.find_template(tid) {
                        Some(template) => match template.recurrence.next_occurrence(from, horizon) {
                            Some(date) => println!("Next occurrence: {date}."),
                            None => println!("No occurrence within {horizon} days."),
                        },
                        None => println!("Error: template {tid} not found"),
                    }
                }
                _ => println!("Usage: next <tid> <from> <horizon_days>"),
            },
            "conflicts" => match args.as_slice() {
                [date, start, end, members] => {
                    let parsed = (parse_date(date), parse_time(start), parse_time(end));
                    let (Some(date), Some(start), Some(end)) = parsed else {
                        println!("Error: could not parse conflict arguments.");
                        continue;
                    };
                    let candidate =
                        CandidateSlot::new(date, start, end, parse_members(members));
                    let busy = plan.check_conflicts(&candidate, None);
                    if busy.is_empty() {
                        println!("No conflicts.");
                    } else {
                        let mut members: Vec<String> = busy.into_iter().collect();
                        members.sort();
                        println!("Busy: {}", members.join(", "));
                    }
                }
                _ => println!("Usage: conflicts <date> <HH:MM> <HH:MM> <a,b,c>"),
            },
            "save" => match args.as_slice() {
                ["json", path] => match save_plan_to_json(&plan, path) {
                    Ok(()) => println!("Plan saved to {path}."),
                    Err(err) => println!("Error: {err}"),
                },
                ["csv", path] => match save_plan_to_csv(&plan, path) {
                    Ok(()) => println!("Plan saved to {path}."),
                    Err(err) => println!("Error: {err}"),
                },
                _ => println!("Usage: save <json|csv> <path>"),
            },
            "load" => match args.as_slice() {
                ["json", path] => match load_plan_from_json(path) {
                    Ok(loaded) => {
                        plan = loaded;
                        println!("Plan loaded from {path}.");
                    }
                    Err(err) => println!("Error: {err}"),
                },
                ["csv", path] => match load_plan_from_csv(path) {
                    Ok(loaded) => {
                        plan = loaded;
                        println!("Plan loaded from {path}.");
                    }
                    Err(err) => println!("Error: {err}"),
                },
                _ => println!("Usage: load <json|csv> <path>"),
            },
            _ => println!("Unknown command '{command}'. Type 'help' for commands."),
        }
    }
}
