//! Prompt templates.

use voicepath_core::task::{Importance, TaskDuration};

/// Prompt asking the model to pull actionable tasks out of a transcription.
pub fn task_extraction(transcription: &str) -> String {
    format!(
        r#"You are a task extraction expert. Analyze the following voice transcription and extract individual, actionable tasks.

Instructions:
- Identify each distinct task or action item mentioned
- Ignore contradictions (if someone says "call mom" then "scratch that, call dad" - only include "call dad")
- Determine appropriate importance level: low, medium, or high
- Determine appropriate duration: short (< 30 min), medium (30min - 3hrs), or long (> 3hrs)
- Create clear, actionable task names
- Ignore filler words, hesitations, and casual speech

Voice transcription to analyze:
"{transcription}"

Return ONLY a JSON array of task objects in this exact format:
[
  {{
    "task_name": "Clear, actionable task name",
    "importance": "low|medium|high",
    "duration": "short|medium|long",
    "is_complete": false,
    "has_subtasks": false
  }}
]

If no clear tasks are found, return an empty array: []

Extract the tasks now:"#
    )
}

/// Prompt asking for a 3-8 step breakdown of one task.
pub fn flowchart(task_name: &str, duration: TaskDuration, importance: Importance) -> String {
    format!(
        r#"You are a task breakdown expert. Break down the given task into sequential subtasks.

Generate 3-8 subtasks that are:
- Actionable and specific
- Sequential and logical
- Appropriate for a {duration} duration task with {importance} importance
- Each subtask should be a clear step toward completing the main task

Task to break down:
Name: {task_name}
Duration: {duration}
Importance: {importance}

Return ONLY a JSON array in this exact format:
[
  {{ "id": "1", "label": "First subtask name", "context": "Brief context about this step" }},
  {{ "id": "2", "label": "Second subtask name", "context": "Brief context about this step" }}
]

Make each subtask a clear, actionable step that moves toward completing "{task_name}".

Generate the flowchart now."#
    )
}

const ASSISTANT_PREAMBLE: &str = "You are a helpful productivity assistant helping users overcome blockers and get unstuck.

Your role:
- Help the user work through specific blockers
- Ask clarifying questions
- Suggest concrete next steps
- Be concise but helpful
- Focus on action over theory
- Use any provided task breakdown context to give more targeted advice
- Reference specific subtasks or progress when relevant";

/// Assistant prompt: fixed preamble, optional task breakdown, then the
/// user's question.
pub fn assistant(user_prompt: &str, breakdown: Option<&str>) -> String {
    let mut prompt = format!("{ASSISTANT_PREAMBLE}\n\nUser prompt:\n");
    if let Some(breakdown) = breakdown.filter(|b| !b.trim().is_empty()) {
        prompt.push_str("TASK BREAKDOWN CONTEXT:\n");
        prompt.push_str(breakdown);
        prompt.push_str("\n\nUser Question: ");
    }
    prompt.push_str(user_prompt);
    prompt
}

/// Prompt asking the model to enrich a single step's description.
pub fn step_context(title: &str, description: &str, request: &str) -> String {
    format!(
        "Title: {title}\n\nDescription:\n{description}\n\nUser Request: {request}\n\n\
         Based on the above context, please provide additional helpful details and context that would improve this block."
    )
}
