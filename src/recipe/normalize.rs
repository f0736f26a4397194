//! Classification and resolution of recipe inputs.

use serde_json::Value;

use super::types::{Classification, RecipeError};

/// Classifies one recipe input by shape.
///
/// A string is a URI when it parses as an absolute URL with a non-empty host.
/// Otherwise an input is an inline recipe when it is an object with a truthy
/// `recipe` key, or a string whose content parses to such an object.
pub fn classify(item: &Value) -> Classification {
    match item {
        Value::String(text) => {
            if let Ok(url) = reqwest::Url::parse(text) {
                if url.host_str().is_some_and(|host| !host.is_empty()) {
                    return Classification::Uri(text.clone());
                }
            }
            match serde_json::from_str::<Value>(text) {
                Ok(parsed) if is_recipe(&parsed) => Classification::Inline(parsed),
                _ => Classification::Invalid,
            }
        }
        Value::Object(_) if is_recipe(item) => Classification::Inline(item.clone()),
        _ => Classification::Invalid,
    }
}

/// Fetches a recipe locator, following redirects, and validates the content.
pub async fn resolve(client: &reqwest::Client, uri: &str) -> Result<Value, RecipeError> {
    let response = client.get(uri).send().await?;
    if !response.status().is_success() {
        return Err(RecipeError::Fetch {
            status: response.status().as_u16(),
        });
    }

    let body: Value = serde_json::from_str(&response.text().await?)?;
    if !is_recipe(&body) {
        return Err(RecipeError::InvalidRecipe(uri.to_string()));
    }
    Ok(body)
}

/// A well-formed recipe document carries a truthy `recipe` key.
pub(crate) fn is_recipe(value: &Value) -> bool {
    value.get("recipe").is_some_and(is_truthy)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
