//! Technical quiz: generation, answering and batched evaluation.

use crate::api::{
    Question, QuizEvaluationRequest, QuizEvaluationResponse, QuizRequest, QuizResponse,
    SkillLevel, UserAnswer,
};

use super::submission::{Submission, Ticket};

pub const MIN_QUESTIONS: u8 = 3;
pub const MAX_QUESTIONS: u8 = 10;
const DEFAULT_QUESTIONS: u8 = 5;

#[derive(Debug)]
pub struct QuizForm {
    pub role: String,
    pub skill_level: SkillLevel,
    num_questions: u8,
    pub generation: Submission<QuizResponse>,
    /// One entry per generated question, same order.
    answers: Vec<String>,
    pub evaluation: Submission<QuizEvaluationResponse>,
}

impl Default for QuizForm {
    fn default() -> Self {
        Self {
            role: String::new(),
            skill_level: SkillLevel::default(),
            num_questions: DEFAULT_QUESTIONS,
            generation: Submission::new(),
            answers: Vec::new(),
            evaluation: Submission::new(),
        }
    }
}

impl QuizForm {
    pub fn num_questions(&self) -> u8 {
        self.num_questions
    }

    /// Store the requested question count, clamped to 3..=10.
    pub fn set_num_questions(&mut self, n: i64) {
        self.num_questions = n.clamp(i64::from(MIN_QUESTIONS), i64::from(MAX_QUESTIONS)) as u8;
    }

    pub fn build_request(&self) -> QuizRequest {
        QuizRequest {
            role: self.role.clone(),
            skill_level: self.skill_level,
            num_questions: self.num_questions,
        }
    }

    pub fn can_generate(&self) -> bool {
        !self.generation.is_submitting()
    }

    /// Start a new quiz.  The previous evaluation and every answer are
    /// discarded.
    pub fn submit_generation(&mut self) -> Option<(Ticket, QuizRequest)> {
        let ticket = self.generation.begin()?;
        self.answers.clear();
        self.evaluation.reset();
        Some((ticket, self.build_request()))
    }

    pub fn complete_generation(&mut self, ticket: Ticket, outcome: Result<QuizResponse, String>) {
        if self.generation.complete(ticket, outcome) {
            self.answers = vec![String::new(); self.questions().len()];
        }
    }

    pub fn questions(&self) -> &[Question] {
        self.generation
            .result()
            .map(|quiz| quiz.questions.as_slice())
            .unwrap_or_default()
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn answer_mut(&mut self, index: usize) -> Option<&mut String> {
        self.answers.get_mut(index)
    }

    pub fn set_answer(&mut self, index: usize, text: impl Into<String>) {
        if let Some(slot) = self.answers.get_mut(index) {
            *slot = text.into();
        }
    }

    /// One entry per question, in question order; blank answers become the
    /// "No answer provided" sentinel.
    pub fn evaluation_request(&self) -> Option<QuizEvaluationRequest> {
        let quiz = self.generation.result()?;
        let answers = quiz
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let answer = self.answers.get(i).map(String::as_str).unwrap_or_default();
                UserAnswer::new(q.question.clone(), answer)
            })
            .collect();
        Some(QuizEvaluationRequest { answers })
    }

    pub fn can_evaluate(&self) -> bool {
        self.generation.result().is_some()
            && !self.generation.is_submitting()
            && !self.evaluation.is_submitting()
    }

    pub fn submit_evaluation(&mut self) -> Option<(Ticket, QuizEvaluationRequest)> {
        if !self.can_evaluate() {
            return None;
        }
        let request = self.evaluation_request()?;
        let ticket = self.evaluation.begin()?;
        Some((ticket, request))
    }
}
