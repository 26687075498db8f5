//! Decision functions used on conditional edges.
//!
//! Each returns a closed route enum; the presets map every variant to a node
//! or `END`. All of them route to `End` once the step budget is spent or an
//! error is recorded, which is what bounds the graph's loops.

use crate::graph::Route;
use crate::state::AgentState;

/// Confidence below which the self-reflective preset refines again.
const REFINE_THRESHOLD: f64 = 0.8;

/// Route of the `decide` gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decision {
    Retrieve,
    Generate,
    End,
}

impl Route for Decision {
    fn all() -> &'static [Self] {
        &[Decision::Retrieve, Decision::Generate, Decision::End]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Decision::Retrieve => "retrieve",
            Decision::Generate => "generate",
            Decision::End => "end",
        }
    }
}

/// Route after evaluation in the self-reflective preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefineDecision {
    Refine,
    End,
}

impl Route for RefineDecision {
    fn all() -> &'static [Self] {
        &[RefineDecision::Refine, RefineDecision::End]
    }

    fn as_str(&self) -> &'static str {
        match self {
            RefineDecision::Refine => "refine",
            RefineDecision::End => "end",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContinueDecision {
    Continue,
    End,
}

impl Route for ContinueDecision {
    fn all() -> &'static [Self] {
        &[ContinueDecision::Continue, ContinueDecision::End]
    }

    fn as_str(&self) -> &'static str {
        match self {
            ContinueDecision::Continue => "continue",
            ContinueDecision::End => "end",
        }
    }
}

/// Picks the next step. Rules are checked in order; the first match wins:
///
/// 1. step budget spent: `End`
/// 2. answer present: `End`
/// 3. error present: `End`
/// 4. retrieval ran but asked for more context: `Generate` (no re-retrieval)
/// 5. retrieval not attempted: `Retrieve`
/// 6. documents present, no answer: `Generate`
/// 7. otherwise (retrieval found nothing): `End`
pub fn decide(state: &AgentState) -> Decision {
    if state.step_limit_reached() || state.has_answer() || state.has_error() {
        return Decision::End;
    }
    match &state.retrieved_docs {
        Some(_) if state.need_more_context => Decision::Generate,
        None => Decision::Retrieve,
        Some(docs) if !docs.is_empty() => Decision::Generate,
        Some(_) => Decision::End,
    }
}

/// Decision function allowing at most `max_refinements` refinement rounds.
///
/// An error ends the loop; so does a confidence of at least 0.8. A missing
/// confidence counts as 0.0.
pub fn should_refine(
    max_refinements: u32,
) -> impl Fn(&AgentState) -> RefineDecision + Send + Sync + 'static {
    move |state: &AgentState| {
        if state.has_error() {
            return RefineDecision::End;
        }
        let confidence = state.confidence_score.unwrap_or(0.0);
        if confidence < REFINE_THRESHOLD && state.refinement_count() < max_refinements {
            RefineDecision::Refine
        } else {
            RefineDecision::End
        }
    }
}

/// `Continue` while the step budget lasts. Guards unconditional follow-up
/// steps (generate → evaluate) so they never run past `max_steps`.
pub fn within_step_budget(state: &AgentState) -> ContinueDecision {
    if state.step_limit_reached() {
        ContinueDecision::End
    } else {
        ContinueDecision::Continue
    }
}

/// `End` on step limit, answer or error; `Continue` otherwise.
pub fn should_continue(state: &AgentState) -> ContinueDecision {
    if state.step_limit_reached() || state.has_answer() || state.has_error() {
        ContinueDecision::End
    } else {
        ContinueDecision::Continue
    }
}
