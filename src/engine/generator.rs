use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

/// Render a threadlight post payload for a theme. The body is the prompt
/// verbatim when one is given, otherwise a formatted spark line with a
/// four-digit seed.
pub fn render_threadlight(theme: &str, prompt: Option<&str>) -> Value {
    let seed = 1000 + (Uuid::new_v4().as_u128() % 9000) as u32;
    let timestamp = Utc::now().to_rfc3339();
    let body = match prompt {
        Some(prompt) => prompt.to_string(),
        None => format!("Threadlight spark for {theme} #{seed}"),
    };

    json!({
        "theme": theme,
        "prompt": prompt,
        "body": body,
        "created_at": timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_overrides_body() {
        let post = render_threadlight("dawn", Some("hand-written"));
        assert_eq!(post["theme"], "dawn");
        assert_eq!(post["prompt"], "hand-written");
        assert_eq!(post["body"], "hand-written");
    }

    #[test]
    fn test_default_body_carries_theme_and_seed() {
        let post = render_threadlight("dawn", None);
        assert_eq!(post["prompt"], Value::Null);

        let body = post["body"].as_str().unwrap();
        assert!(body.starts_with("Threadlight spark for dawn #"));

        let seed: u32 = body.rsplit('#').next().unwrap().parse().unwrap();
        assert!((1000..=9999).contains(&seed));
    }
}
