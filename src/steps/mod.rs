//! Instruction decomposition: a structured LLM call with a deterministic
//! regex fallback. The public entry point never fails; any problem in the
//! primary tier degrades to the fallback tier.

mod fallback;
mod prompt;

pub use fallback::{
    classify_animation, decompose_fallback, extract_duration, extract_ingredients,
    extract_temperature, parse_ingredient_line,
};
pub use prompt::{build_prompt, STEP_PARSER_PROMPT};

use crate::model::{AnimationType, DurationUnit, Ingredient, ProcessedStep, TemperatureUnit};
use crate::providers::LlmProvider;
use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
enum DecomposeError {
    #[error("provider call failed: {0}")]
    Provider(String),
    #[error("reply was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reply shape invalid: {0}")]
    Shape(String),
}

/// One element of the model's JSON array reply. Everything is optional here;
/// validation happens when converting to [`ProcessedStep`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmStep {
    action: Option<String>,
    #[serde(default)]
    ingredients: Vec<Ingredient>,
    duration: Option<u32>,
    duration_unit: Option<DurationUnit>,
    temperature: Option<i32>,
    temperature_unit: Option<TemperatureUnit>,
    animation_type: Option<AnimationType>,
    notes: Option<String>,
}

/// Models often wrap JSON in markdown code fences despite instructions.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip an optional language tag on the opening fence line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end_matches('`').trim()
}

async fn primary(
    instructions: &[String],
    ingredients: &[Ingredient],
    provider: &dyn LlmProvider,
) -> Result<Vec<ProcessedStep>, DecomposeError> {
    let full_prompt = build_prompt(instructions, ingredients);
    let raw = provider
        .generate(&full_prompt)
        .await
        .map_err(|e| DecomposeError::Provider(e.to_string()))?;

    let cleaned = strip_code_fences(&raw);
    let parsed: Vec<LlmStep> = serde_json::from_str(cleaned)?;

    if parsed.len() != instructions.len() {
        return Err(DecomposeError::Shape(format!(
            "expected {} steps, got {}",
            instructions.len(),
            parsed.len()
        )));
    }

    let total = instructions.len() as u32;
    parsed
        .into_iter()
        .enumerate()
        .map(|(index, step)| {
            let action = step
                .action
                .filter(|a| !a.trim().is_empty())
                .ok_or_else(|| {
                    DecomposeError::Shape(format!("step {} is missing an action", index + 1))
                })?;

            // Step numbers come from array position, not from the model.
            Ok(ProcessedStep {
                step_number: index as u32 + 1,
                total_steps: total,
                action,
                ingredients: step.ingredients,
                duration: step.duration,
                duration_unit: step.duration_unit,
                temperature: step.temperature,
                temperature_unit: step.temperature_unit,
                animation_type: step.animation_type,
                notes: step.notes,
            })
        })
        .collect()
}

/// Decompose instructions into structured steps. Tries the provider first and
/// falls back to regex extraction on any failure, so the result always has
/// exactly one step per instruction.
pub async fn decompose(
    instructions: &[String],
    ingredients: &[Ingredient],
    provider: &dyn LlmProvider,
) -> Vec<ProcessedStep> {
    match primary(instructions, ingredients, provider).await {
        Ok(steps) => {
            debug!(
                "Parsed {} steps via provider '{}'",
                steps.len(),
                provider.provider_name()
            );
            steps
        }
        Err(e) => {
            warn!("Structured step parsing failed ({}), using regex fallback", e);
            decompose_fallback(instructions, ingredients)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::error::Error;

    struct CannedProvider {
        reply: Result<String, String>,
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        fn provider_name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
            self.reply.clone().map_err(|e| e.into())
        }
    }

    fn instructions(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("[1, 2]"), "[1, 2]");
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("```\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("  [1, 2]  "), "[1, 2]");
    }

    #[tokio::test]
    async fn test_decompose_uses_provider_reply() {
        let provider = CannedProvider {
            reply: Ok(r#"[
                {"action": "Chop the onions", "animationType": "cutting",
                 "ingredients": [{"name": "onion", "quantity": 2.0}]},
                {"action": "Simmer the sauce", "animationType": "heating",
                 "duration": 20, "durationUnit": "minutes"}
            ]"#
            .to_string()),
        };

        let steps = decompose(
            &instructions(&["Chop 2 onions", "Simmer for 20 minutes"]),
            &[],
            &provider,
        )
        .await;

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].action, "Chop the onions");
        assert_eq!(steps[0].step_number, 1);
        assert_eq!(steps[0].total_steps, 2);
        assert_eq!(steps[0].ingredients[0].name, "onion");
        assert_eq!(steps[1].duration, Some(20));
        assert_eq!(steps[1].duration_unit, Some(DurationUnit::Minutes));
    }

    #[tokio::test]
    async fn test_decompose_accepts_fenced_reply() {
        let provider = CannedProvider {
            reply: Ok("```json\n[{\"action\": \"Stir well\"}]\n```".to_string()),
        };

        let steps = decompose(&instructions(&["Stir well"]), &[], &provider).await;
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].action, "Stir well");
    }

    #[tokio::test]
    async fn test_decompose_falls_back_on_provider_error() {
        let provider = CannedProvider {
            reply: Err("connection refused".to_string()),
        };

        let steps = decompose(
            &instructions(&["Simmer for 20 minutes at 180 F"]),
            &[],
            &provider,
        )
        .await;

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].duration, Some(20));
        assert_eq!(steps[0].temperature, Some(180));
        assert_eq!(steps[0].animation_type, Some(AnimationType::Heating));
    }

    #[tokio::test]
    async fn test_decompose_falls_back_on_invalid_json() {
        let provider = CannedProvider {
            reply: Ok("I'm sorry, I can't parse that.".to_string()),
        };

        let steps = decompose(&instructions(&["Whisk the eggs"]), &[], &provider).await;
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].action, "Whisk the eggs");
        assert_eq!(steps[0].animation_type, Some(AnimationType::Whisking));
    }

    #[tokio::test]
    async fn test_decompose_falls_back_on_wrong_length() {
        // Two instructions in, one step out: reply is discarded.
        let provider = CannedProvider {
            reply: Ok(r#"[{"action": "Do everything at once"}]"#.to_string()),
        };

        let steps = decompose(
            &instructions(&["Chop the garlic", "Fry the garlic"]),
            &[],
            &provider,
        )
        .await;

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].action, "Chop the garlic");
        assert_eq!(steps[1].action, "Fry the garlic");
    }

    #[tokio::test]
    async fn test_decompose_falls_back_on_missing_action() {
        let provider = CannedProvider {
            reply: Ok(r#"[{"action": ""}]"#.to_string()),
        };

        let steps = decompose(&instructions(&["Peel the potatoes"]), &[], &provider).await;
        assert_eq!(steps[0].action, "Peel the potatoes");
        assert_eq!(steps[0].animation_type, Some(AnimationType::Peeling));
    }

    #[tokio::test]
    async fn test_step_numbers_ignore_model_claims() {
        let provider = CannedProvider {
            reply: Ok(r#"[
                {"action": "First", "stepNumber": 7},
                {"action": "Second", "stepNumber": 99}
            ]"#
            .to_string()),
        };

        let steps = decompose(&instructions(&["a", "b"]), &[], &provider).await;
        assert_eq!(steps[0].step_number, 1);
        assert_eq!(steps[1].step_number, 2);
    }
}
