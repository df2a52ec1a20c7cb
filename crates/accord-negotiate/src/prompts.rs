//! Prompt construction for the advisory and mediator roles.
//!
//! Candidate listings and constraints are rendered as JSON so the model
//! sees exactly the structures the verifier will enforce. Verifier feedback
//! stays structured ([`Violation`] values) until the final rendering step;
//! nothing is accumulated through string concatenation.

use serde::Serialize;

use accord_slate::{Catalog, CandidateWindow, ConstraintSpec};
use accord_verify::Violation;

/// One candidate as shown to the model.
#[derive(Debug, Serialize)]
struct CandidateRecord<'a> {
    item_id: u64,
    tier: &'a str,
    genres: Vec<&'a str>,
    score: f64,
}

/// Render the window as a JSON array of candidate records.
///
/// Candidates without catalog metadata are omitted; they are equally
/// invisible to feasibility analysis and repair.
pub fn render_candidates(
    window: &CandidateWindow,
    catalog: &Catalog,
) -> serde_json::Result<String> {
    let records: Vec<CandidateRecord<'_>> = window
        .iter()
        .filter_map(|candidate| {
            catalog.get(candidate.item_id).map(|meta| CandidateRecord {
                item_id: candidate.item_id.as_u64(),
                tier: meta.tier.as_str(),
                genres: meta.genres.iter().map(String::as_str).collect(),
                score: candidate.score,
            })
        })
        .collect();
    serde_json::to_string_pretty(&records)
}

/// Render the constraint spec as pretty JSON.
pub fn render_constraints(spec: &ConstraintSpec) -> serde_json::Result<String> {
    serde_json::to_string_pretty(spec)
}

/// Prompt for the user-preference advisory.
#[must_use]
pub fn user_advocate_prompt(candidates_json: &str) -> String {
    format!(
        "You are the User Advocate.\n\
         Your goal is to maximize user satisfaction by analyzing the candidate list and the\n\
         user's implicit preferences (high relevance scores indicate likely enjoyment).\n\
         Advocate for the items the user will enjoy most, prioritizing high scores.\n\
         Output a concise summary (bullet points) of what the user wants, naming specific items.\n\
         \n\
         Candidate list:\n{candidates_json}\n\
         \n\
         What are the best items for this user?\n"
    )
}

/// Prompt for the platform-policy advisory.
#[must_use]
pub fn platform_policy_prompt(candidates_json: &str, constraints_json: &str) -> String {
    format!(
        "You are the Platform Policy Agent.\n\
         Your goal is to enforce the following constraints:\n{constraints_json}\n\
         \n\
         Analyze the candidate list and highlight which items are head vs tail and which\n\
         carry genres that help satisfy diversity. Warn against selecting too many head\n\
         items or too few tail items.\n\
         Output a concise summary (bullet points) of policy requirements and the specific\n\
         items that help meet them.\n\
         \n\
         Candidate list:\n{candidates_json}\n"
    )
}

/// Everything the mediator sees in one round.
#[derive(Debug, Clone, Copy)]
pub struct MediatorContext<'a> {
    /// Target slate size.
    pub slate_size: usize,
    /// Constraint spec rendering.
    pub constraints_json: &'a str,
    /// Candidate window rendering.
    pub candidates_json: &'a str,
    /// The user-preference advisory, generated once.
    pub user_advisory: &'a str,
    /// The policy advisory, generated once.
    pub policy_advisory: &'a str,
    /// The previous round's verification failures; empty on round one.
    pub feedback: &'a [Violation],
}

impl MediatorContext<'_> {
    /// Render the mediator prompt for this round.
    #[must_use]
    pub fn render(&self) -> String {
        let feedback = if self.feedback.is_empty() {
            "None".to_string()
        } else {
            self.feedback
                .iter()
                .map(|v| format!("- {v}"))
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            "You are the Mediator.\n\
             Select exactly {n} items from the provided candidate list, balancing the User\n\
             Advocate's requests with the Platform Policy's constraints.\n\
             Produce a JSON proof certificate containing your selection, your claimed\n\
             statistics and the negotiation trace.\n\
             \n\
             Constraints to satisfy:\n{constraints}\n\
             \n\
             Candidate list:\n{candidates}\n\
             \n\
             User Advocate summary:\n{user}\n\
             \n\
             Platform Policy summary:\n{policy}\n\
             \n\
             Previous verifier feedback:\n{feedback}\n\
             \n\
             Instructions:\n\
             1. Select exactly {n} items from the candidate list. Never invent ids.\n\
             2. Meet ALL constraints (safety, popularity, diversity).\n\
             3. Fill claimed_stats with your own counts.\n\
             4. Record the round in negotiation_trace with your decision rationale.\n",
            n = self.slate_size,
            constraints = self.constraints_json,
            candidates = self.candidates_json,
            user = self.user_advisory,
            policy = self.policy_advisory,
            feedback = feedback,
        )
    }
}

#[cfg(test)]
mod tests {
    use accord_slate::{ItemId, ItemMeta, PopularityTier, ScoredCandidate};

    use super::*;

    fn fixture() -> (CandidateWindow, Catalog) {
        let catalog: Catalog = [
            (
                ItemId(1),
                ItemMeta::new(PopularityTier::Head, ["Action", "Sci-Fi"]),
            ),
            (ItemId(2), ItemMeta::new(PopularityTier::Tail, ["Drama"])),
        ]
        .into_iter()
        .collect();
        let window = CandidateWindow::from_sorted(vec![
            ScoredCandidate::new(ItemId(1), 0.9),
            ScoredCandidate::new(ItemId(2), 0.4),
        ]);
        (window, catalog)
    }

    #[test]
    fn candidates_render_in_score_order_with_metadata() {
        let (window, catalog) = fixture();
        let json = render_candidates(&window, &catalog).unwrap();
        let records: serde_json::Value = serde_json::from_str(&json).unwrap();
        let records = records.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["item_id"], 1);
        assert_eq!(records[0]["tier"], "head");
        assert_eq!(records[1]["genres"][0], "Drama");
    }

    #[test]
    fn uncataloged_candidates_are_omitted() {
        let (_, catalog) = fixture();
        let window = CandidateWindow::from_sorted(vec![ScoredCandidate::new(ItemId(42), 1.0)]);
        let json = render_candidates(&window, &catalog).unwrap();
        assert_eq!(json.trim(), "[]");
    }

    #[test]
    fn mediator_prompt_reports_no_feedback_on_round_one() {
        let context = MediatorContext {
            slate_size: 5,
            constraints_json: "{}",
            candidates_json: "[]",
            user_advisory: "wants action",
            policy_advisory: "needs tail",
            feedback: &[],
        };
        let prompt = context.render();
        assert!(prompt.contains("Select exactly 5 items"));
        assert!(prompt.contains("Previous verifier feedback:\nNone"));
    }

    #[test]
    fn mediator_prompt_lists_structured_feedback() {
        let feedback = vec![
            Violation::TooManyHead { count: 4, limit: 2 },
            Violation::TooFewTail { count: 0, limit: 1 },
        ];
        let context = MediatorContext {
            slate_size: 5,
            constraints_json: "{}",
            candidates_json: "[]",
            user_advisory: "",
            policy_advisory: "",
            feedback: &feedback,
        };
        let prompt = context.render();
        assert!(prompt.contains("- too many head items: 4 > 2"));
        assert!(prompt.contains("- too few tail items: 0 < 1"));
    }

    #[test]
    fn advisory_prompts_embed_inputs() {
        let user = user_advocate_prompt("[CANDS]");
        assert!(user.contains("[CANDS]"));
        let policy = platform_policy_prompt("[CANDS]", "[SPEC]");
        assert!(policy.contains("[CANDS]"));
        assert!(policy.contains("[SPEC]"));
    }
}
