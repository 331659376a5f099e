// ABOUTME: Demo service with echo and add-numbers tools and a summarize prompt
// ABOUTME: Smallest useful example of the service contract for new providers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::Deserialize;
use serde_json::json;

use crate::services::Service;
use crate::tools::{typed_handler, Prompt, Tool, ToolHints, ToolOutput};
use crate::validation::SchemaNode;

/// Service name
pub const NAME: &str = "demo";

#[derive(Debug, Deserialize)]
struct EchoArgs {
    text: String,
}

#[derive(Debug, Deserialize)]
struct AddArgs {
    a: f64,
    b: f64,
}

/// Render a number the way a person would write it (`5`, not `5.0`)
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract().abs() < f64::EPSILON && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Build the demo service
#[must_use]
pub fn service() -> Service {
    let pure = ToolHints::READ_ONLY | ToolHints::IDEMPOTENT;

    Service::builder(NAME)
        .description("Example tools for checking the proxy end to end")
        .tool(
            Tool::new(
                "echo",
                "Echo the given text back",
                SchemaNode::object()
                    .required_property("text", SchemaNode::string().describe("Text to echo")),
            )
            .with_hints(pure),
            typed_handler(|args: EchoArgs, _ctx| async move {
                Ok(ToolOutput::text(format!("Echo: {}", args.text)))
            }),
        )
        .tool(
            Tool::new(
                "add-numbers",
                "Add two numbers",
                SchemaNode::object()
                    .required_property("a", SchemaNode::number().describe("First addend"))
                    .required_property("b", SchemaNode::number().describe("Second addend")),
            )
            .with_hints(pure),
            typed_handler(|args: AddArgs, _ctx| async move {
                Ok(ToolOutput::text(format!(
                    "{} + {} = {}",
                    format_number(args.a),
                    format_number(args.b),
                    format_number(args.a + args.b)
                )))
            }),
        )
        .prompt(Prompt::new(
            "summarize",
            "Summarize text",
            "Ask the model for a concise summary",
            SchemaNode::object()
                .required_property("text", SchemaNode::string().describe("Text to summarize"))
                .property(
                    "max_words",
                    SchemaNode {
                        default: Some(json!(100)),
                        ..SchemaNode::integer()
                            .range(Some(1.0), None)
                            .describe("Upper bound on summary length")
                    },
                ),
            "Summarize the following text in at most {{max_words}} words:\n\n{{text}}",
        ))
        .build()
}
