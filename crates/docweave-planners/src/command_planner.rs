//! Command planner
//!
//! Resolves a user command to a plan. Known commands hit the static
//! catalog and return their precomputed plan without touching the
//! generative backend; anything else is planned by the backend from a
//! prompt enumerating the tool registry. The backend may answer with a
//! JSON array of steps (a plan) or plain prose (an advisory message) —
//! both are valid outcomes the caller must distinguish.

use std::fmt::Write;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use docweave_core::catalog::PlanCatalog;
use docweave_core::planner::{PlanError, Planner, PlannerOutput};
use docweave_core::tool::ToolRegistry;
use docweave_core::types::{Plan, Step};
use docweave_llm::{CompletionRequest, GenerativeBackend};

const MAX_PROMPT_LOG_CHARS: usize = 4_000;
const MAX_OUTPUT_LOG_CHARS: usize = 8_000;

/// Planner config for the generative fallback.
#[derive(Debug, Clone)]
pub struct CommandPlannerConfig {
    /// Token budget for the planning completion.
    pub max_tokens: u32,
    /// Sampling temperature. Planning wants determinism; keep at 0.
    pub temperature: f32,
}

impl Default for CommandPlannerConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.0,
        }
    }
}

/// Catalog-first planner with a generative fallback.
pub struct CommandPlanner<B: GenerativeBackend> {
    backend: B,
    catalog: PlanCatalog,
    registry: ToolRegistry,
    config: CommandPlannerConfig,
}

impl<B: GenerativeBackend> CommandPlanner<B> {
    pub fn new(backend: B, catalog: PlanCatalog, registry: ToolRegistry) -> Self {
        Self {
            backend,
            catalog,
            registry,
            config: CommandPlannerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CommandPlannerConfig) -> Self {
        self.config = config;
        self
    }

    fn build_prompt(&self, command: &str, context: Option<&str>) -> String {
        let mut tools = String::new();
        for spec in self.registry.iter() {
            let _ = writeln!(
                tools,
                "- {}: {} Input: {}",
                spec.name, spec.description, spec.example_input
            );
        }

        format!(
            r#"You are an intelligent document workflow orchestrator.

Your job is to analyze the user's request and plan the sequence of tool invocations needed to complete it.

---

Available tools:
{tools}
---

Behavior:
- If the user's request requires multiple steps, respond with a JSON list of tool calls like:
  [
    {{"tool": "fetch_documents", "input": {{"source": "blob_storage"}}}},
    {{"tool": "batch_summarize", "input": {{"documents": "use_previous_result"}}}},
    {{"tool": "merge_document", "input": {{"folder_updates": "use_previous_result", "output_filename": "merged.docx"}}}}
  ]

- If no tools are needed and the user is asking something general (e.g. "What tools do you have?"), respond with a plain string.

- Do NOT explain anything. Only return either:
  - A plain string
  - OR a valid JSON array of tool calls

---

User command: {command}
Context: {context}
"#,
            tools = tools,
            command = command,
            context = context.unwrap_or("None"),
        )
    }
}

/// Classify the backend's answer: step list, prose, or neither.
fn parse_planner_response(content: &str) -> Result<PlannerOutput, PlanError> {
    let trimmed = content.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(_)) => {
            let steps: Vec<Step> = serde_json::from_str(trimmed)
                .map_err(|e| PlanError::MalformedPlan(format!("{e}: {trimmed}")))?;
            Ok(PlannerOutput::Plan(Plan::new(steps)))
        }
        // Valid JSON that is not a step list is neither a plan nor prose.
        Ok(_) => Err(PlanError::MalformedPlan(trimmed.to_string())),
        Err(_) => Ok(PlannerOutput::Message(trimmed.to_string())),
    }
}

#[async_trait]
impl<B: GenerativeBackend> Planner for CommandPlanner<B> {
    async fn plan(
        &self,
        command: &str,
        context: Option<&str>,
    ) -> Result<PlannerOutput, PlanError> {
        if let Some(plan) = self.catalog.lookup(command) {
            info!(step_count = plan.len(), "catalog plan hit");
            return Ok(PlannerOutput::Plan(plan.clone()));
        }

        let prompt = self.build_prompt(command, context);
        info!(
            command_len = command.len(),
            tool_count = self.registry.len(),
            max_tokens = self.config.max_tokens,
            "planning via generative backend"
        );
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                prompt = %truncate_for_log(&prompt, MAX_PROMPT_LOG_CHARS),
                "planner prompt"
            );
        }

        let request = CompletionRequest::new(
            prompt,
            self.config.max_tokens,
            self.config.temperature,
        );
        let content = self
            .backend
            .complete(request)
            .await
            .map_err(|e| PlanError::Backend(e.to_string()))?;
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                output = %truncate_for_log(&content, MAX_OUTPUT_LOG_CHARS),
                "planner raw backend output"
            );
        }

        let output = parse_planner_response(&content)?;
        match &output {
            PlannerOutput::Plan(plan) => {
                // Reject unknown tool names here, before anything executes.
                for step in &plan.steps {
                    if !self.registry.contains(&step.tool) {
                        return Err(PlanError::UnknownTool(step.tool.clone()));
                    }
                }
                info!(step_count = plan.len(), "planner parsed plan");
            }
            PlannerOutput::Message(_) => info!("planner returned advisory message"),
        }
        Ok(output)
    }
}

fn truncate_for_log(input: &str, max_chars: usize) -> String {
    let char_count = input.chars().count();
    if char_count <= max_chars {
        return input.to_string();
    }
    let mut preview: String = input.chars().take(max_chars).collect();
    preview.push_str(&format!("... [truncated, total_chars={}]", char_count));
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use docweave_core::types::StepInput;
    use docweave_llm::MockBackend;

    fn planner(backend: MockBackend) -> CommandPlanner<MockBackend> {
        CommandPlanner::new(backend, PlanCatalog::builtin(), ToolRegistry::builtin())
    }

    #[test]
    fn test_exact_catalog_hit_skips_the_backend() {
        tokio_test::block_on(async {
            let planner = planner(MockBackend::replying("should never be used"));
            let output = planner.plan("merge all the documents", None).await.unwrap();

            let PlannerOutput::Plan(plan) = output else {
                panic!("expected plan");
            };
            assert_eq!(plan.len(), 3);
            assert_eq!(plan.steps[0].tool, "fetch_documents");
            assert_eq!(planner.backend.call_count(), 0);
        });
    }

    #[test]
    fn test_normalized_command_matches_catalog() {
        tokio_test::block_on(async {
            let planner = planner(MockBackend::replying("unused"));
            let exact = planner.plan("merge all the documents", None).await.unwrap();
            let messy = planner
                .plan("  Merge ALL the Documents  ", None)
                .await
                .unwrap();
            assert_eq!(exact, messy);
            assert_eq!(planner.backend.call_count(), 0);
        });
    }

    #[test]
    fn test_fuzzy_catalog_hit_skips_the_backend() {
        tokio_test::block_on(async {
            let planner = planner(MockBackend::replying("unused"));
            let output = planner.plan("merge all the document", None).await.unwrap();
            assert!(matches!(output, PlannerOutput::Plan(_)));
            assert_eq!(planner.backend.call_count(), 0);
        });
    }

    #[test]
    fn test_unknown_command_invokes_the_backend() {
        tokio_test::block_on(async {
            let planner = planner(MockBackend::replying(
                r#"[{"tool": "fetch_documents", "input": {"source": "blob_storage"}}]"#,
            ));
            let output = planner
                .plan("archive everything from last month", None)
                .await
                .unwrap();

            let PlannerOutput::Plan(plan) = output else {
                panic!("expected plan");
            };
            assert_eq!(plan.len(), 1);
            assert_eq!(planner.backend.call_count(), 1);
        });
    }

    #[test]
    fn test_prose_response_becomes_advisory_message() {
        tokio_test::block_on(async {
            let planner = planner(MockBackend::replying(
                "I can fetch, summarize and merge documents.",
            ));
            let output = planner.plan("what tools do you have?", None).await.unwrap();
            assert_eq!(
                output,
                PlannerOutput::Message("I can fetch, summarize and merge documents.".to_string())
            );
        });
    }

    #[test]
    fn test_json_object_response_is_a_plan_error() {
        tokio_test::block_on(async {
            let planner = planner(MockBackend::replying(r#"{"tool": "fetch_documents"}"#));
            let err = planner
                .plan("do something unusual", None)
                .await
                .unwrap_err();
            assert!(matches!(err, PlanError::MalformedPlan(_)));
        });
    }

    #[test]
    fn test_array_of_malformed_steps_is_a_plan_error() {
        tokio_test::block_on(async {
            let planner = planner(MockBackend::replying(r#"[{"input": {}}]"#));
            let err = planner.plan("do something odd", None).await.unwrap_err();
            assert!(matches!(err, PlanError::MalformedPlan(_)));
        });
    }

    #[test]
    fn test_unknown_tool_in_generated_plan_is_rejected() {
        tokio_test::block_on(async {
            let planner = planner(MockBackend::replying(
                r#"[{"tool": "delete_everything", "input": {}}]"#,
            ));
            let err = planner.plan("clean up the store", None).await.unwrap_err();
            match err {
                PlanError::UnknownTool(tool) => assert_eq!(tool, "delete_everything"),
                other => panic!("expected UnknownTool, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_backend_failure_surfaces_as_plan_error() {
        tokio_test::block_on(async {
            let planner = planner(MockBackend::failing(|| {
                docweave_llm::BackendError::Http("connection refused".into())
            }));
            let err = planner.plan("do something odd", None).await.unwrap_err();
            assert!(matches!(err, PlanError::Backend(_)));
        });
    }

    #[test]
    fn test_parsed_plan_preserves_placeholders() {
        tokio_test::block_on(async {
            let planner = planner(MockBackend::replying(
                r#"[{"tool": "merge_document", "input": {"folder_updates": "use_previous_result"}}]"#,
            ));
            let output = planner.plan("merge with custom flow", None).await.unwrap();
            let PlannerOutput::Plan(plan) = output else {
                panic!("expected plan");
            };
            assert_eq!(
                plan.steps[0].input.get("folder_updates"),
                Some(&StepInput::UsePrevious)
            );
        });
    }

    #[test]
    fn test_prompt_lists_every_registered_tool() {
        let planner = planner(MockBackend::replying("unused"));
        let prompt = planner.build_prompt("do the thing", Some("prior context"));
        for name in [
            "fetch_documents",
            "batch_summarize",
            "merge_document",
            "create_directory",
        ] {
            assert!(prompt.contains(name), "prompt missing {name}");
        }
        assert!(prompt.contains("User command: do the thing"));
        assert!(prompt.contains("Context: prior context"));
    }
}
