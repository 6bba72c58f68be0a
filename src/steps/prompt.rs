use crate::model::Ingredient;

/// The system prompt for the structured step-parsing call.
///
/// Loaded from `prompt.txt` at compile time using the `include_str!` macro,
/// making it easy to edit without dealing with Rust string syntax.
pub const STEP_PARSER_PROMPT: &str = include_str!("prompt.txt");

/// Build the combined prompt: system rules, the numbered instruction list and
/// the known ingredient list for quantity cross-referencing.
pub fn build_prompt(instructions: &[String], ingredients: &[Ingredient]) -> String {
    let numbered = instructions
        .iter()
        .enumerate()
        .map(|(i, instruction)| format!("{}. {}", i + 1, instruction))
        .collect::<Vec<_>>()
        .join("\n");

    let known = if ingredients.is_empty() {
        "(none provided)".to_string()
    } else {
        ingredients
            .iter()
            .map(|ing| {
                let mut line = format!("- {}", ing.name);
                if let Some(quantity) = ing.quantity {
                    line.push_str(&format!(" (quantity: {}", quantity));
                    if let Some(unit) = &ing.unit {
                        line.push_str(&format!(" {}", unit));
                    }
                    line.push(')');
                } else if let Some(unit) = &ing.unit {
                    line.push_str(&format!(" ({})", unit));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "{}\n\nKnown ingredients:\n{}\n\nInstructions:\n{}\n\nParse these instructions into the required format.",
        STEP_PARSER_PROMPT, known, numbered
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_embedded() {
        assert!(!STEP_PARSER_PROMPT.is_empty());
        assert!(STEP_PARSER_PROMPT.contains("animation types"));
        assert!(STEP_PARSER_PROMPT.contains("durationUnit"));
        assert!(STEP_PARSER_PROMPT.contains("JSON array"));
    }

    #[test]
    fn test_build_prompt_numbers_instructions() {
        let instructions = vec!["Chop onions".to_string(), "Fry them".to_string()];
        let prompt = build_prompt(&instructions, &[]);
        assert!(prompt.contains("1. Chop onions"));
        assert!(prompt.contains("2. Fry them"));
        assert!(prompt.contains("(none provided)"));
    }

    #[test]
    fn test_build_prompt_lists_known_ingredients() {
        let ingredients = vec![Ingredient {
            name: "flour".to_string(),
            quantity: Some(2.0),
            unit: Some("cups".to_string()),
            preparation: None,
        }];
        let prompt = build_prompt(&["Mix the flour".to_string()], &ingredients);
        assert!(prompt.contains("- flour (quantity: 2 cups)"));
    }
}
