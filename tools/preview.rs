/// Preview: interactive playthrough shell for testing story scripts.
///
/// Usage: preview <script.twee|manifest.ron> [--start <title>]
///
/// Commands:
///   look            show the current passage and its options
///   go <n>          take option n
///   next / prev     move the selection
///   ok              take the selected option
///   inv             show money, items and facts
///   give <item>     add an item
///   take <item>     remove an item
///   money <n>       add (or with a minus sign, take) money
///   fact <name>     add a fact
///   help            list commands
///   quit            exit

use std::io::{self, BufRead, Write};
use std::path::Path;
use story_engine::core::dialog::Dialog;
use story_engine::Story;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let path = Path::new(&args[1]);
    let mut start = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--start" if i + 1 < args.len() => {
                i += 1;
                start = Some(args[i].clone());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut builder = if path.extension().and_then(|s| s.to_str()) == Some("ron") {
        Story::builder().manifest(path)
    } else {
        Story::builder().script_path(path)
    };
    if let Some(ref title) = start {
        builder = builder.start(title);
    }
    builder = builder.with_listener(|event| {
        println!("[Inventory] money={} items={}", event.money, event.items.len());
    });

    let mut story = match builder.build() {
        Ok(story) => story,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    let mut dialog = match Dialog::start(&mut story) {
        Ok(Some(dialog)) => dialog,
        Ok(None) => {
            eprintln!("ERROR: no start passage; pass --start <title> or set it in the manifest");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    println!("Loaded '{}' with {} passages", story.title(), story.passages().count());
    println!("Type 'help' for commands.\n");
    show(&story, &dialog);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(' ') {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (line.to_lowercase(), ""),
        };

        let result = match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
                Ok(())
            }
            "look" | "l" => {
                show(&story, &dialog);
                Ok(())
            }
            "next" | "n" => dialog.select_next(&story).map(|_| show_options(&story, &dialog)),
            "prev" | "p" => dialog
                .select_previous(&story)
                .map(|_| show_options(&story, &dialog)),
            "go" | "ok" => {
                let selected = if cmd == "go" {
                    match rest.parse::<usize>() {
                        Ok(n) if n > 0 => dialog.select(&story, n - 1),
                        _ => {
                            println!("Usage: go <n>");
                            continue;
                        }
                    }
                } else {
                    Ok(())
                };
                selected.and_then(|_| dialog.confirm(&mut story)).map(|moved| {
                    if moved.is_some() {
                        show(&story, &dialog);
                    } else {
                        println!("Nowhere to go.");
                    }
                })
            }
            "inv" | "i" => {
                print_inventory(&story);
                Ok(())
            }
            "give" if !rest.is_empty() => {
                story.add_item(rest);
                Ok(())
            }
            "take" if !rest.is_empty() => {
                story.take_item(rest);
                Ok(())
            }
            "money" => match rest.parse::<i64>() {
                Ok(amount) => story.add_money(amount),
                Err(_) => {
                    println!("Usage: money <n>");
                    Ok(())
                }
            },
            "fact" if !rest.is_empty() => {
                story.add_fact(rest);
                Ok(())
            }
            _ => {
                println!("Unknown command: '{}'. Type 'help' for available commands.", line);
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("ERROR: {}", e);
        }
    }
}

fn show(story: &Story, dialog: &Dialog) {
    let passage = story.passage(dialog.passage());
    println!("\n=== {} ===", passage.display_title());
    match story.content(dialog.passage()) {
        Ok(text) => print!("{}", text),
        Err(e) => println!("ERROR: {}", e),
    }
    show_options(story, dialog);
}

fn show_options(story: &Story, dialog: &Dialog) {
    let options = match dialog.options(story) {
        Ok(options) => options,
        Err(e) => {
            println!("ERROR: {}", e);
            return;
        }
    };
    if options.is_empty() {
        println!("\n(The End)");
        return;
    }

    println!();
    for (index, option) in options.iter().enumerate() {
        let marker = if option.selected { ">" } else { " " };
        let done = match story.branch_complete(option.link) {
            Ok(true) => " (explored)",
            _ => "",
        };
        println!("{} {}. {}{}", marker, index + 1, option.text, done);
    }
}

fn print_inventory(story: &Story) {
    let state = story.state();
    println!("Money: {}", state.money());
    if state.items().is_empty() {
        println!("Items: none");
    } else {
        println!("Items:");
        for item in state.items() {
            println!("  {} x{}", item.name, item.count);
        }
    }
    let mut facts: Vec<&String> = state.facts().iter().collect();
    facts.sort();
    println!("Facts: {:?}", facts);
}

fn print_usage() {
    println!("Preview: interactive playthrough shell for story scripts.");
    println!();
    println!("Usage: preview <script.twee|manifest.ron> [--start <title>]");
    println!();
    println!("  --start <title>  Passage to begin in (overrides the manifest)");
}

fn print_help() {
    println!("Commands:");
    println!("  look            Show the current passage and its options");
    println!("  go <n>          Take option n");
    println!("  next / prev     Move the selection");
    println!("  ok              Take the selected option");
    println!("  inv             Show money, items and facts");
    println!("  give <item>     Add an item");
    println!("  take <item>     Remove an item");
    println!("  money <n>       Add money (negative to take)");
    println!("  fact <name>     Add a fact");
    println!("  help            Show this help");
    println!("  quit            Exit");
}
