//! Prompt templates for the orchestration modes

/// Templates for the system preambles and follow-up turns of each mode
pub struct PromptTemplate;

impl PromptTemplate {
    // ==================== Conversation ====================

    /// System preamble for the speaker at `position` (0-based).
    ///
    /// Positions past the third fall back to the moderator preamble.
    pub fn conversation_system(position: usize) -> &'static str {
        match position {
            1 => {
                "You are a specialist who adds technical depth when helpful. Build on the previous response with additional insights, but keep it concise (≤6 sentences)."
            }
            2 => {
                "You are a clarifier who fixes small errors and improves readability. Polish the previous responses into a clear, final answer."
            }
            _ => {
                "You are a thoughtful moderator. Provide a concise answer and invite others to add their perspectives. Keep it conversational and under 6 sentences."
            }
        }
    }

    /// Follow-up turn listing every earlier speaker as "Speaker N".
    pub fn previous_speakers(responses: &[String]) -> String {
        let context = responses
            .iter()
            .enumerate()
            .map(|(i, text)| format!("Speaker {}: {}", i + 1, text))
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("Previous responses:\n{}\n\nPlease add your perspective.", context)
    }

    // ==================== Answer ====================

    pub fn answer_seed_system() -> &'static str {
        "Answer concisely and directly. If uncertain, say what's missing."
    }

    pub fn answer_refine_system() -> &'static str {
        "You are a careful editor. Improve the previous answer by correcting mistakes and adding missing key points. Keep it concise."
    }

    pub fn answer_refine_prompt(previous: &str) -> String {
        format!("Previous answer:\n{}\n\nPlease improve this answer.", previous)
    }

    /// Follow-up for the extra refine round triggered by a low judge score.
    pub fn answer_refine_further_prompt(previous: &str) -> String {
        format!(
            "Previous answer:\n{}\n\nPlease improve this answer further.",
            previous
        )
    }

    pub fn answer_polish_system() -> &'static str {
        "You are a polishing assistant. Tighten clarity and remove redundancy from the previous answer. Return only the improved version."
    }

    pub fn answer_polish_prompt(previous: &str) -> String {
        format!("Previous answer:\n{}\n\nPlease polish this answer.", previous)
    }

    // ==================== Argumentative ====================

    pub fn debate_propose_system() -> &'static str {
        "Propose an answer and state key assumptions briefly."
    }

    pub fn arbiter_system() -> &'static str {
        "You are an arbiter who resolves disagreements. Compare both responses, choose stronger reasoning with brief justification, then produce a single final answer. Note remaining uncertainty if any."
    }

    pub fn arbiter_prompt(response_a: &str, response_b: &str) -> String {
        format!(
            "Two responses to consider:\n\nResponse A:\n{}\n\nResponse B:\n{}\n\nPlease provide your final arbitrated answer.",
            response_a, response_b
        )
    }

    // ==================== Research ====================

    pub fn research_lead_system() -> &'static str {
        "You are the lead researcher. Produce a thorough, structured outline answer in bullet points. If sources are provided in context, cite them."
    }

    pub fn research_suggest_system() -> &'static str {
        "Suggest improvements ONLY (no rewrite). Return bullet points: missing angles, data to fetch, structure changes, key caveats."
    }

    pub fn research_outline_prompt(outline: &str) -> String {
        format!("LEAD_OUTLINE:\n{}", outline)
    }

    pub fn research_rewrite_system() -> &'static str {
        "Rewrite the answer, incorporating the suggestions. Keep correct parts; add missing key points. If sources were provided, cite like [S1]. Return ONLY the rewritten answer."
    }

    pub fn research_rewrite_prompt(lead: &str, suggestions: &str) -> String {
        format!("LEAD:\n{}\n\nSUGGESTIONS:\n{}", lead, suggestions)
    }

    /// System preamble for rewrites inside the refinement loop.
    pub fn research_revise_system() -> &'static str {
        "Rewrite the answer, incorporating the suggestions. Keep correct parts; add missing key points. Return ONLY the rewritten answer."
    }

    pub fn research_draft_prompt(draft: &str) -> String {
        format!("Current draft:\n{}", draft)
    }

    pub fn research_revise_prompt(draft: &str, suggestions: &str) -> String {
        format!("Current draft:\n{}\n\nSUGGESTIONS:\n{}", draft, suggestions)
    }

    // ==================== Connectivity ====================

    /// Minimal prompt used to check that a provider answers at all.
    pub fn probe() -> &'static str {
        "Hello! Please respond with just \"OK\" to test the connection."
    }
}
