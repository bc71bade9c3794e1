/// Story Linter: validates a story script and reports structural problems.
///
/// Usage: story_linter <script.twee|manifest.ron> [--start <title>]
///
/// Parse and build failures are errors, as are item and fact conditions that
/// no macro provides and macros with an empty name. Unreachable passages,
/// dead ends and `once` passages nothing links to are warnings.

use std::path::Path;
use std::process;
use story_engine::core::lint::lint_story;
use story_engine::{Story, StoryBuilder};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: story_linter <script.twee|manifest.ron> [--start <title>]");
        process::exit(0);
    }

    let path = Path::new(&args[1]);
    let mut start = None;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--start" && i + 1 < args.len() {
            i += 1;
            start = Some(args[i].clone());
        }
        i += 1;
    }

    if !path.is_file() {
        eprintln!("ERROR: Path '{}' does not exist", path.display());
        process::exit(1);
    }

    let mut builder = builder_for(path);
    if let Some(ref title) = start {
        builder = builder.start(title);
    }

    let story = match builder.build() {
        Ok(story) => story,
        Err(e) => {
            println!("\n=== Story Lint Report ===\n");
            println!("ERROR: {}", e);
            println!("\nSummary: 1 errors, 0 warnings");
            process::exit(1);
        }
    };

    println!(
        "Loaded '{}': {} passages, {} links",
        story.title(),
        story.passages().count(),
        story.links_iter().count()
    );

    let (errors, warnings) = lint_story(&story);

    println!("\n=== Story Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }
    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if !errors.is_empty() {
        process::exit(1);
    }
}

fn builder_for(path: &Path) -> StoryBuilder {
    if path.extension().and_then(|s| s.to_str()) == Some("ron") {
        Story::builder().manifest(path)
    } else {
        Story::builder().script_path(path)
    }
}
