//! Context-stuffed prompt assembly.

use std::collections::BTreeMap;

use ragengine_core::Metadata;
use serde_json::Value;

/// Renders the context block of a single retrieval node.
///
/// Metadata lines (`key: value`, sorted by key) precede the text, separated
/// by a blank line. Without metadata the context is the text alone.
pub fn node_context(text: &str, metadata: &Metadata) -> String {
    if metadata.is_empty() {
        return text.to_owned();
    }

    let sorted: BTreeMap<&String, &Value> = metadata.iter().collect();
    let lines: Vec<String> = sorted
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("{key}: {s}"),
            other => format!("{key}: {other}"),
        })
        .collect();

    format!("{}\n\n{text}", lines.join("\n"))
}

/// Builds the completion prompt for `query` over ranked node contexts.
pub fn render_prompt<'a>(contexts: impl IntoIterator<Item = &'a str>, query: &str) -> String {
    let context = contexts.into_iter().collect::<Vec<_>>().join("\n\n");
    format!(
        "Context information is below.\n\
         ---------------------\n\
         {context}\n\
         ---------------------\n\
         Given the context information and not prior knowledge, answer the query.\n\
         Query: {query}\n\
         Answer: "
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn prompt_is_byte_exact() {
        let mut metadata = Metadata::new();
        metadata.insert("type".to_owned(), json!("text"));
        let context = node_context("First document", &metadata);

        let prompt = render_prompt([context.as_str()], "First");
        assert_eq!(
            prompt,
            "Context information is below.\n---------------------\ntype: text\n\nFirst document\n---------------------\nGiven the context information and not prior knowledge, answer the query.\nQuery: First\nAnswer: "
        );
    }

    #[test]
    fn metadata_is_sorted_and_typed() {
        let mut metadata = Metadata::new();
        metadata.insert("z".to_owned(), json!(1));
        metadata.insert("a".to_owned(), json!(["x", true]));
        assert_eq!(
            node_context("body", &metadata),
            "a: [\"x\",true]\nz: 1\n\nbody"
        );
    }

    #[test]
    fn nodes_are_separated_by_blank_lines() {
        let prompt = render_prompt(["one", "two"], "q");
        assert!(prompt.contains("---------------------\none\n\ntwo\n---------------------"));
        assert_eq!(node_context("bare", &Metadata::new()), "bare");
    }
}
