//! Answer review hooks
//!
//! Answer mode can consult a judge (to decide whether another refine round
//! is worth it) and a verifier (to check the final answer). Both are
//! infallible by contract. The defaults are fixed-output placeholders until
//! real scorers are plugged in.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Scores an answer to a question, higher is better (0-10).
#[async_trait]
pub trait AnswerJudge: Send + Sync {
    async fn score(&self, question: &str, answer: &str) -> f32;
}

/// Checks a finalized answer. The outcome never alters the answer.
#[async_trait]
pub trait AnswerVerifier: Send + Sync {
    async fn verify(&self, answer: &str) -> VerificationReport;
}

/// Claim indices grouped by how the evidence relates to them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub entailed: Vec<usize>,
    pub neutral: Vec<usize>,
    pub contradicted: Vec<usize>,
}

impl VerificationReport {
    pub fn has_contradictions(&self) -> bool {
        !self.contradicted.is_empty()
    }
}

/// Judge that returns the same score for every answer.
pub struct FixedScoreJudge {
    score: f32,
}

impl FixedScoreJudge {
    /// The score reported until a judge model is wired in.
    pub const DEFAULT_SCORE: f32 = 8.5;

    pub fn new(score: f32) -> Self {
        Self { score }
    }
}

impl Default for FixedScoreJudge {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SCORE)
    }
}

#[async_trait]
impl AnswerJudge for FixedScoreJudge {
    async fn score(&self, _question: &str, _answer: &str) -> f32 {
        self.score
    }
}

/// Verifier that checks nothing and reports an empty result.
pub struct NoVerification;

#[async_trait]
impl AnswerVerifier for NoVerification {
    async fn verify(&self, _answer: &str) -> VerificationReport {
        VerificationReport::default()
    }
}
