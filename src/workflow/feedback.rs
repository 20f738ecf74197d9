//! Scored interview evaluation.
//!
//! [`capture_feedback`] turns raw operator input into an immutable
//! [`FeedbackRecord`]. Every score must be present, finite, within
//! `0.0..=10.0` and on a `0.1` step; comments must be non-empty once trimmed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A score in tenths of a point, `0.0..=10.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(u8);

impl Score {
    pub const MAX_TENTHS: u8 = 100;

    pub fn tenths(self) -> u8 {
        self.0
    }

    pub fn value(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl TryFrom<f64> for Score {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err("must be a number".to_string());
        }
        if !(0.0..=10.0).contains(&value) {
            return Err(format!("must be between 0 and 10, got {value}"));
        }
        let scaled = value * 10.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 {
            return Err(format!("must use steps of 0.1, got {value}"));
        }
        Ok(Score(rounded as u8))
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.value()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// Raw, unvalidated feedback as entered by the interviewer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackInput {
    pub technical: Option<f64>,
    pub communication: Option<f64>,
    pub problem_solving: Option<f64>,
    pub overall: Option<f64>,
    pub comments: String,
}

impl FeedbackInput {
    pub fn scored(
        technical: f64,
        communication: f64,
        problem_solving: f64,
        overall: f64,
        comments: impl Into<String>,
    ) -> Self {
        Self {
            technical: Some(technical),
            communication: Some(communication),
            problem_solving: Some(problem_solving),
            overall: Some(overall),
            comments: comments.into(),
        }
    }
}

/// Validated evaluation attached to an interview when it is marked done.
///
/// Fields are read-only: once attached the record is never edited or replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    technical_score: Score,
    communication_score: Score,
    problem_solving_score: Score,
    overall_score: Score,
    comments: String,
    captured_at: DateTime<Utc>,
}

impl FeedbackRecord {
    pub fn technical_score(&self) -> Score {
        self.technical_score
    }

    pub fn communication_score(&self) -> Score {
        self.communication_score
    }

    pub fn problem_solving_score(&self) -> Score {
        self.problem_solving_score
    }

    pub fn overall_score(&self) -> Score {
        self.overall_score
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

/// Validate `input` and stamp it with the current time.
pub fn capture_feedback(input: &FeedbackInput) -> Result<FeedbackRecord, ValidationError> {
    capture_feedback_at(input, Utc::now())
}

/// Validate `input` and stamp it with `captured_at`.
///
/// All fields are checked before returning so the error names every problem.
pub fn capture_feedback_at(
    input: &FeedbackInput,
    captured_at: DateTime<Utc>,
) -> Result<FeedbackRecord, ValidationError> {
    let mut errors = ValidationError::new();

    let mut score = |field: &'static str, raw: Option<f64>| -> Option<Score> {
        let Some(value) = raw else {
            errors.push(field, "is required");
            return None;
        };
        Score::try_from(value)
            .map_err(|message| errors.push(field, message))
            .ok()
    };

    let technical = score("technical_score", input.technical);
    let communication = score("communication_score", input.communication);
    let problem_solving = score("problem_solving_score", input.problem_solving);
    let overall = score("overall_score", input.overall);

    let comments = input.comments.trim();
    if comments.is_empty() {
        errors.push("comments", "must not be empty");
    }

    match (technical, communication, problem_solving, overall) {
        (Some(technical), Some(communication), Some(problem_solving), Some(overall))
            if errors.is_empty() =>
        {
            Ok(FeedbackRecord {
                technical_score: technical,
                communication_score: communication,
                problem_solving_score: problem_solving,
                overall_score: overall,
                comments: comments.to_string(),
                captured_at,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_valid_feedback() {
        let input = FeedbackInput::scored(8.0, 7.0, 9.0, 8.0, "  Strong candidate ");
        let record = capture_feedback(&input).unwrap();
        assert_eq!(record.technical_score().tenths(), 80);
        assert_eq!(record.communication_score().tenths(), 70);
        assert_eq!(record.problem_solving_score().tenths(), 90);
        assert_eq!(record.overall_score().value(), 8.0);
        assert_eq!(record.comments(), "Strong candidate");
    }

    #[test]
    fn accepts_bounds_and_fractions() {
        let input = FeedbackInput::scored(0.0, 10.0, 7.3, 9.9, "ok");
        let record = capture_feedback(&input).unwrap();
        assert_eq!(record.technical_score().tenths(), 0);
        assert_eq!(record.communication_score().tenths(), 100);
        assert_eq!(record.problem_solving_score().to_string(), "7.3");
        assert_eq!(record.overall_score().to_string(), "9.9");
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let input = FeedbackInput::scored(11.0, 7.0, 9.0, 8.0, "Strong candidate");
        let err = capture_feedback(&input).unwrap_err();
        assert_eq!(err.fields().len(), 1);
        assert!(err.has_field("technical_score"));
    }

    #[test]
    fn reports_every_invalid_field() {
        let input = FeedbackInput {
            technical: Some(-1.0),
            communication: None,
            problem_solving: Some(f64::NAN),
            overall: Some(7.25),
            comments: "   ".into(),
        };
        let err = capture_feedback(&input).unwrap_err();
        let fields: Vec<_> = err.fields().iter().map(|f| f.field).collect();
        assert_eq!(
            fields,
            vec![
                "technical_score",
                "communication_score",
                "problem_solving_score",
                "overall_score",
                "comments"
            ]
        );
    }

    #[test]
    fn empty_comment_alone_is_rejected() {
        let input = FeedbackInput::scored(5.0, 5.0, 5.0, 5.0, "");
        let err = capture_feedback(&input).unwrap_err();
        assert_eq!(err.fields().len(), 1);
        assert!(err.has_field("comments"));
    }

    #[test]
    fn record_serializes_scores_as_numbers() {
        let input = FeedbackInput::scored(8.5, 7.0, 9.0, 8.0, "Good");
        let record = capture_feedback(&input).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["technicalScore"], 8.5);
        assert_eq!(json["comments"], "Good");

        let back: FeedbackRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn deserializing_out_of_range_score_fails() {
        let json = serde_json::json!({
            "technicalScore": 12.0,
            "communicationScore": 7.0,
            "problemSolvingScore": 9.0,
            "overallScore": 8.0,
            "comments": "x",
            "capturedAt": "2026-01-01T00:00:00Z"
        });
        assert!(serde_json::from_value::<FeedbackRecord>(json).is_err());
    }
}
