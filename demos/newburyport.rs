/// Newburyport example: plays the sample story along a fixed route.
///
/// Spend a night at the YMCA, buy a newspaper, buy a ticket and board the
/// train to Arkham. Each step prints the passage text and the visible options.
///
/// Run with: cargo run --example newburyport

use story_engine::core::dialog::Dialog;
use story_engine::Story;

const ROUTE: &[&str] = &[
    "Visit your room at YMCA",
    "Go outside",
    "Talk with the Shopkeeper",
    "Buy a newspaper",
    "Back",
    "Leave",
    "Read the newspaper",
    "Fold it",
    "Go to the train station",
    "Check tickets to Arkham",
    "Buy a ticket",
    "Back",
    "Board the train to Arkham",
];

fn main() {
    // --- Load the story from its manifest ---
    let mut story = Story::builder()
        .manifest("stories/newburyport.ron")
        .with_listener(|event| {
            let items: Vec<String> = event
                .items
                .iter()
                .map(|item| format!("{} x{}", item.name, item.count))
                .collect();
            println!("  [inventory] ${} {:?}", event.money, items);
        })
        .build()
        .expect("Failed to load Newburyport");

    println!("=== {} ===\n", story.title());

    let mut dialog = Dialog::start(&mut story)
        .expect("Failed to enter the start passage")
        .expect("Manifest has no start passage");

    for choice in ROUTE {
        print_passage(&story, &dialog);

        let options = dialog.options(&story).expect("Failed to list options");
        let index = options
            .iter()
            .position(|option| option.text == *choice)
            .unwrap_or_else(|| panic!("Option '{}' is not available", choice));

        println!("\n> {}\n", choice);
        dialog.select(&story, index).expect("Failed to select");
        dialog.confirm(&mut story).expect("Failed to follow link");
    }

    print_passage(&story, &dialog);

    let state = story.state();
    println!("\n--- Final state ---");
    println!("Money: {}", state.money());
    for item in state.items() {
        println!("Item: {} x{}", item.name, item.count);
    }
    let mut facts: Vec<&String> = state.facts().iter().collect();
    facts.sort();
    println!("Facts: {:?}", facts);
}

fn print_passage(story: &Story, dialog: &Dialog) {
    let passage = story.passage(dialog.passage());
    println!("[{}]", passage.display_title());
    print!("{}", story.content(dialog.passage()).expect("Failed to render"));

    for option in dialog.options(story).expect("Failed to list options") {
        println!("  * {}", option.text);
    }
}
