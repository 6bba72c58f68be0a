use cookflow::error::ExtractError;
use log::error;
use std::env;
use std::process::ExitCode;

const USAGE: &str = "Usage: cookflow <url> [servings] [--steps]";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let with_steps = args.iter().any(|a| a == "--steps");
    let mut positional = args.iter().filter(|a| !a.starts_with("--"));

    let Some(url) = positional.next() else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    let servings = match positional.next().map(|s| s.parse::<u32>()) {
        Some(Ok(n)) if n >= 1 => Some(n),
        Some(_) => {
            eprintln!("Servings must be a positive number.\n{}", USAGE);
            return ExitCode::FAILURE;
        }
        None => None,
    };

    match run(url, servings, with_steps).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(url: &str, servings: Option<u32>, with_steps: bool) -> Result<(), ExtractError> {
    let recipe = cookflow::extract_recipe(url, servings).await?;

    if with_steps {
        let known = cookflow::known_ingredients(&recipe.ingredients);
        let steps = cookflow::process_instructions(&recipe.instructions, &known).await;
        let output = serde_json::json!({ "recipe": recipe, "steps": steps });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    }

    Ok(())
}
