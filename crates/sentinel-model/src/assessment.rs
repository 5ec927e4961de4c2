//! Vendor security questionnaire
//!
//! Twelve yes/no/n-a questions. The score is the share of "yes" answers over
//! the full questionnaire, so unanswered and n/a questions count against it.

use crate::validation::ValidationError;
use crate::vendor::{AssessmentScore, ComplianceStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One questionnaire item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub id: u8,
    pub text: &'static str,
}

/// The vendor security questionnaire
pub const SECURITY_QUESTIONS: [Question; 12] = [
    Question { id: 1, text: "Does the vendor enforce Multi-Factor Authentication (MFA)?" },
    Question { id: 2, text: "Is data encrypted at rest and in transit?" },
    Question { id: 3, text: "Does the vendor have ISO 27001 certification?" },
    Question { id: 4, text: "Are regular security audits and penetration tests conducted?" },
    Question { id: 5, text: "Is there a formal incident response plan?" },
    Question { id: 6, text: "Does the vendor comply with GDPR/CCPA requirements?" },
    Question { id: 7, text: "Are access controls role-based with least privilege?" },
    Question { id: 8, text: "Is customer data logically segregated?" },
    Question { id: 9, text: "Are data backups encrypted and tested regularly?" },
    Question { id: 10, text: "Does the vendor provide SOC 2 Type II reports?" },
    Question { id: 11, text: "Is there 24/7 security monitoring and alerting?" },
    Question { id: 12, text: "Are all employees required to complete security training?" },
];

/// Answer to a questionnaire item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
    #[serde(rename = "na")]
    NotApplicable,
}

impl Display for Answer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::NotApplicable => "na",
        })
    }
}

impl FromStr for Answer {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(Self::Yes),
            "no" | "n" => Ok(Self::No),
            "na" | "n/a" => Ok(Self::NotApplicable),
            _ => Err(ValidationError::unparseable("answer", s)),
        }
    }
}

/// A (possibly partial) set of answers keyed by question id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Assessment {
    answers: BTreeMap<u8, Answer>,
}

impl Assessment {
    /// Empty assessment
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assessment where the first `count` questions are "yes" and the rest "no"
    #[must_use]
    pub fn with_yes_count(count: usize) -> Self {
        let answers = SECURITY_QUESTIONS
            .iter()
            .enumerate()
            .map(|(i, q)| (q.id, if i < count { Answer::Yes } else { Answer::No }))
            .collect();
        Self { answers }
    }

    /// Record an answer
    ///
    /// # Errors
    /// Returns [`ValidationError::OutOfRange`] for an unknown question id
    pub fn answer(&mut self, question: u8, answer: Answer) -> Result<(), ValidationError> {
        let total = SECURITY_QUESTIONS.len() as u32;
        if question == 0 || u32::from(question) > total {
            return Err(ValidationError::OutOfRange {
                field: "question",
                min: 1,
                max: total,
                actual: u32::from(question),
            });
        }
        self.answers.insert(question, answer);
        Ok(())
    }

    /// Builder form of [`Assessment::answer`]
    ///
    /// # Errors
    /// Returns [`ValidationError::OutOfRange`] for an unknown question id
    pub fn with_answer(mut self, question: u8, answer: Answer) -> Result<Self, ValidationError> {
        self.answer(question, answer)?;
        Ok(self)
    }

    /// Parse a compact answer list such as `"yes,no,na,yes"` in question order
    ///
    /// A blank entry leaves its question unanswered.
    ///
    /// # Errors
    /// Returns an error for unknown answers or more than twelve entries
    pub fn from_answer_list(list: &str) -> Result<Self, ValidationError> {
        let mut assessment = Self::new();
        for (idx, raw) in list.split(',').enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            let question = u8::try_from(idx + 1)
                .map_err(|_| ValidationError::unparseable("answer list", list))?;
            assessment.answer(question, raw.parse()?)?;
        }
        Ok(assessment)
    }

    /// Answer to a question, if given
    #[must_use]
    pub fn get(&self, question: u8) -> Option<Answer> {
        self.answers.get(&question).copied()
    }

    /// Number of "yes" answers
    #[must_use]
    pub fn yes_count(&self) -> usize {
        self.answers.values().filter(|a| **a == Answer::Yes).count()
    }

    /// True when every question has an answer
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answers.len() == SECURITY_QUESTIONS.len()
    }

    /// `round(100 * yes / 12)`
    #[must_use]
    pub fn score(&self) -> AssessmentScore {
        AssessmentScore::from_ratio(self.yes_count(), SECURITY_QUESTIONS.len())
    }

    /// Compliance band of the score
    #[must_use]
    pub fn compliance_status(&self) -> ComplianceStatus {
        ComplianceStatus::from_score(self.score())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ten_of_twelve_is_compliant() {
        let assessment = Assessment::with_yes_count(10);
        assert_eq!(assessment.score().value(), 83);
        assert_eq!(assessment.compliance_status(), ComplianceStatus::Compliant);
    }

    #[test]
    fn unanswered_counts_against_score() {
        let assessment = Assessment::new()
            .with_answer(1, Answer::Yes)
            .unwrap()
            .with_answer(2, Answer::NotApplicable)
            .unwrap();
        assert!(!assessment.is_complete());
        assert_eq!(assessment.score().value(), 8);
        assert_eq!(assessment.compliance_status(), ComplianceStatus::NonCompliant);
    }

    #[test]
    fn unknown_question_rejected() {
        let mut assessment = Assessment::new();
        assert!(assessment.answer(0, Answer::Yes).is_err());
        assert!(assessment.answer(13, Answer::Yes).is_err());
    }

    #[test]
    fn answer_list_parsing() {
        let assessment = Assessment::from_answer_list("yes,no,na,y,n,n/a").unwrap();
        assert_eq!(assessment.yes_count(), 2);
        assert_eq!(assessment.get(3), Some(Answer::NotApplicable));
        assert!(Assessment::from_answer_list("yes,maybe").is_err());
        assert!(Assessment::from_answer_list(&vec!["yes"; 13].join(",")).is_err());
    }

    #[test]
    fn blank_entry_leaves_question_unanswered() {
        let assessment = Assessment::from_answer_list("yes,,no, ,yes").unwrap();
        assert_eq!(assessment.get(1), Some(Answer::Yes));
        assert_eq!(assessment.get(2), None);
        assert_eq!(assessment.get(3), Some(Answer::No));
        assert_eq!(assessment.get(4), None);
        assert_eq!(assessment.get(5), Some(Answer::Yes));
        assert_eq!(assessment.yes_count(), 2);
    }

    #[test]
    fn boundary_bands() {
        // 8/12 = 66.7 -> 67 Under Review, 7/12 = 58.3 -> 58 Non-Compliant
        assert_eq!(Assessment::with_yes_count(8).compliance_status(), ComplianceStatus::UnderReview);
        assert_eq!(Assessment::with_yes_count(7).compliance_status(), ComplianceStatus::NonCompliant);
        assert_eq!(Assessment::with_yes_count(12).score().value(), 100);
        assert_eq!(Assessment::with_yes_count(0).score().value(), 0);
    }

    proptest! {
        #[test]
        fn score_is_rounded_share(yes in 0usize..=12) {
            let assessment = Assessment::with_yes_count(yes);
            let expected = (100.0 * yes as f64 / 12.0).round() as u8;
            prop_assert_eq!(assessment.score().value(), expected);

            let status = assessment.compliance_status();
            let score = assessment.score().value();
            prop_assert_eq!(status == ComplianceStatus::Compliant, score >= 80);
            prop_assert_eq!(status == ComplianceStatus::UnderReview, (60..80).contains(&score));
        }
    }
}
