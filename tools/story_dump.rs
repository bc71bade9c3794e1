/// Story Dump: prints the parsed form of a script as RON.
///
/// Usage: story_dump <script.twee> [--output <file.ron>]
///
/// Useful for checking how segments, conditions and links were read
/// without playing through the story.

use ron::ser::PrettyConfig;
use std::process;
use story_engine::core::parser::parse_story;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut input = None;
    let mut output = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--output" if i + 1 < args.len() => {
                i += 1;
                output = Some(args[i].clone());
            }
            "--help" | "-h" => {
                println!("Usage: story_dump <script.twee> [--output <file.ron>]");
                process::exit(0);
            }
            other if input.is_none() => input = Some(other.to_string()),
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let input_path = input.unwrap_or_else(|| {
        eprintln!("Error: a script path is required");
        eprintln!("Usage: story_dump <script.twee> [--output <file.ron>]");
        process::exit(1);
    });

    let source = std::fs::read_to_string(&input_path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", input_path, e);
        process::exit(1);
    });

    let story = parse_story(&source).unwrap_or_else(|e| {
        eprintln!("Error parsing {}: {}", input_path, e);
        process::exit(1);
    });

    let pretty = PrettyConfig::new().depth_limit(6).indentor("  ".to_string());
    let serialized = ron::ser::to_string_pretty(&story, pretty).unwrap_or_else(|e| {
        eprintln!("Error serializing story: {}", e);
        process::exit(1);
    });

    match output {
        Some(path) => {
            std::fs::write(&path, &serialized).unwrap_or_else(|e| {
                eprintln!("Error writing {}: {}", path, e);
                process::exit(1);
            });
            eprintln!(
                "Dumped {} passages from {} to {}",
                story.passages.len(),
                input_path,
                path
            );
        }
        None => println!("{}", serialized),
    }
}
