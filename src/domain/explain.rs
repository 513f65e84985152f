//! AI tutor and analyst.
//!
//! Builds prompts from analysed bonds and turns every failure of the text
//! service into a placeholder message. Analytics never depends on this.

use std::fmt;

use tracing::warn;

use crate::domain::analytics::AnalyzedBond;
use crate::domain::bond::BondType;
use crate::domain::error::BondwatchError;
use crate::domain::request_gate::RequestGate;
use crate::ports::explain_port::ExplainPort;

pub const NO_KEY_MESSAGE: &str =
    "API key not configured. Set GEMINI_API_KEY (or the [ai] api_key_env variable) to enable AI answers.";
pub const TUTOR_FAILURE_MESSAGE: &str =
    "Sorry, I'm having trouble connecting to the knowledge base.";
pub const TUTOR_EMPTY_MESSAGE: &str = "I couldn't generate an answer right now.";
pub const ANALYST_FAILURE_MESSAGE: &str = "Error connecting to AI analyst. Please try again.";
pub const ANALYST_EMPTY_MESSAGE: &str = "Could not generate analysis.";
pub const TIMEOUT_MESSAGE: &str = "The AI service took too long to respond. Please try again.";
pub const BUSY_MESSAGE: &str = "A request is already in progress. Please wait for it to finish.";

pub fn tutor_prompt(question: &str) -> String {
    format!(
        "You are a friendly financial tutor for the Kenyan Bond Market.\n\
         User Question: \"{}\"\n\n\
         Provide a simple, 2-3 sentence explanation suitable for a complete beginner.\n\
         Use local context (e.g. Nairobi Securities Exchange, 15% tax) where applicable.",
        question.trim()
    )
}

pub fn analysis_prompt(bond: &AnalyzedBond) -> String {
    let terms = &bond.terms;
    let mut prompt = format!(
        "Analyze this Kenyan Government Bond for a retail investor:\n\
         Issue: {}\n\
         Type: {}\n\
         Price: {} (Par 100)\n\
         Coupon: {}%\n\
         Yield (YTM): {:.2}%\n\
         Tenor: {} years\n\
         Days to Maturity: {}\n\
         Market Z-Score: {:.2}\n\n\
         Is this bond trading at a discount or premium? Is the yield attractive compared to the coupon?\n\
         Provide a 3 sentence summary advice.",
        terms.issue_number,
        terms.bond_type,
        terms.price,
        terms.coupon_rate_percent,
        bond.yield_to_maturity,
        terms.tenor_years,
        bond.days_to_maturity,
        bond.z_score,
    );
    if terms.bond_type == BondType::InfrastructureBond {
        prompt.push_str(" Highlight its tax benefits as an Infrastructure Bond (IFB).");
    }
    prompt
}

/// What the UI shows: either generated text or a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explanation {
    Answer(String),
    Unavailable(String),
}

impl Explanation {
    pub fn text(&self) -> &str {
        match self {
            Explanation::Answer(s) | Explanation::Unavailable(s) => s,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Explanation::Answer(_))
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Tutor and analyst surfaces, each allowing one request at a time.
pub struct Explainer<P: ExplainPort> {
    port: P,
    tutor: RequestGate,
    analyst: RequestGate,
}

impl<P: ExplainPort> Explainer<P> {
    pub fn new(port: P) -> Self {
        Self {
            port,
            tutor: RequestGate::new("tutor"),
            analyst: RequestGate::new("analyst"),
        }
    }

    /// Answer a free-text question. Blank questions yield `None`.
    pub fn ask(&self, question: &str) -> Option<Explanation> {
        if question.trim().is_empty() {
            return None;
        }
        Some(self.run(
            &self.tutor,
            &tutor_prompt(question),
            TUTOR_FAILURE_MESSAGE,
            TUTOR_EMPTY_MESSAGE,
        ))
    }

    pub fn explain_bond(&self, bond: &AnalyzedBond) -> Explanation {
        self.run(
            &self.analyst,
            &analysis_prompt(bond),
            ANALYST_FAILURE_MESSAGE,
            ANALYST_EMPTY_MESSAGE,
        )
    }

    fn run(
        &self,
        gate: &RequestGate,
        prompt: &str,
        failure: &str,
        empty: &str,
    ) -> Explanation {
        let _permit = match gate.try_acquire() {
            Ok(p) => p,
            Err(_) => return Explanation::Unavailable(BUSY_MESSAGE.to_string()),
        };
        match self.port.generate(prompt) {
            Ok(text) if !text.trim().is_empty() => Explanation::Answer(text.trim().to_string()),
            Ok(_) => Explanation::Unavailable(empty.to_string()),
            Err(e) => {
                warn!(surface = gate.surface(), error = %e, "explanation unavailable");
                Explanation::Unavailable(placeholder_for(&e, failure))
            }
        }
    }
}

fn placeholder_for(err: &BondwatchError, failure: &str) -> String {
    match err {
        BondwatchError::ExternalServiceUnavailable { reason } if reason.contains("API key") => {
            NO_KEY_MESSAGE.to_string()
        }
        BondwatchError::ExternalTimeout { .. } => TIMEOUT_MESSAGE.to_string(),
        BondwatchError::Busy { .. } => BUSY_MESSAGE.to_string(),
        _ => failure.to_string(),
    }
}
