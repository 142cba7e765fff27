use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    auth::{require_owner_or_admin, require_role},
    errors::AppResult,
    models::domain::{
        submission::{percentage, round2},
        Caller, ProgressRecord, ProgressStatus, Quiz, StudentProgress, StudentStats, Submission,
        UserRole,
    },
    repositories::QuizRepository,
    services::{access_service::AccessService, scoring},
};

/// Read-only view of a student's standing, recomputed on every call.
pub struct ProgressService {
    quizzes: Arc<dyn QuizRepository>,
    access: Arc<AccessService>,
}

impl ProgressService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, access: Arc<AccessService>) -> Self {
        Self { quizzes, access }
    }

    /// Students may read their own progress; admins anyone's.
    pub async fn progress_for(&self, caller: &Caller, student_id: &str) -> AppResult<StudentProgress> {
        if !caller.is_admin() {
            require_role(caller, UserRole::Student)?;
        }
        require_owner_or_admin(caller, student_id)?;
        self.student_progress(student_id).await
    }

    pub async fn student_progress(&self, student_id: &str) -> AppResult<StudentProgress> {
        self.student_progress_at(student_id, Utc::now()).await
    }

    pub async fn student_progress_at(
        &self,
        student_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<StudentProgress> {
        let instructors = self.access.authorized_instructor_ids(student_id).await?;
        let quizzes = self.quizzes.list_by_instructors(&instructors).await?;

        let quiz_progress: Vec<ProgressRecord> = quizzes
            .iter()
            .filter(|quiz| quiz.is_active && instructors.contains(&quiz.instructor_id))
            .map(|quiz| progress_record(quiz, student_id))
            .collect();
        let stats = summarize(&quiz_progress, now);

        log::debug!(
            "Progress for student {}: {} quizzes, {} completed",
            student_id,
            stats.total_quizzes,
            stats.completed_quizzes
        );
        Ok(StudentProgress {
            quiz_progress,
            stats,
        })
    }
}

fn progress_record(quiz: &Quiz, student_id: &str) -> ProgressRecord {
    let attempts: Vec<&Submission> = quiz.submissions_by(student_id).collect();
    let due_date = quiz
        .assignment_for(student_id)
        .and_then(|assignment| assignment.due_date);

    let mut record = ProgressRecord {
        quiz_id: quiz.id.clone(),
        title: quiz.title.clone(),
        status: ProgressStatus::NotStarted,
        total_questions: quiz.questions.len() as u32,
        completed_questions: 0,
        score: None,
        max_score: scoring::max_score(&quiz.questions),
        time_spent: attempts.iter().map(|s| u64::from(s.time_spent)).sum(),
        attempts: attempts.len() as u32,
        max_attempts: quiz.settings.attempts_allowed,
        started_at: None,
        completed_at: None,
        due_date,
    };

    // Best by percentage, then raw score; ties go to the latest attempt.
    let best = attempts.iter().max_by(|a, b| {
        a.percentage()
            .total_cmp(&b.percentage())
            .then(a.score.cmp(&b.score))
    });
    if let Some(best) = best {
        record.status = ProgressStatus::Completed;
        record.completed_questions = best.answered_count();
        record.score = Some(best.score);
        record.max_score = best.max_score;
        record.started_at = Some(best.started_at);
        record.completed_at = Some(best.completed_at);
    }
    record
}

fn summarize(records: &[ProgressRecord], now: DateTime<Utc>) -> StudentStats {
    let completed: Vec<f64> = records
        .iter()
        .filter(|record| record.status == ProgressStatus::Completed)
        .filter_map(|record| record.score.map(|score| percentage(score, record.max_score)))
        .collect();

    let average_score = if completed.is_empty() {
        0.0
    } else {
        round2(completed.iter().sum::<f64>() / completed.len() as f64)
    };

    let pending_due: Vec<DateTime<Utc>> = records
        .iter()
        .filter(|record| record.status == ProgressStatus::NotStarted)
        .filter_map(|record| record.due_date)
        .collect();

    StudentStats {
        total_quizzes: records.len() as u32,
        completed_quizzes: completed.len() as u32,
        average_score,
        total_time_spent: records.iter().map(|record| record.time_spent).sum(),
        upcoming_quizzes: pending_due.iter().filter(|due| **due > now).count() as u32,
        overdue_quizzes: pending_due.iter().filter(|due| **due <= now).count() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::models::domain::{Assignment, Question, QuestionType, QuizSettings};

    fn question(points: u32) -> Question {
        Question {
            id: uuid::Uuid::new_v4().to_string(),
            text: "?".to_string(),
            question_type: QuestionType::TrueFalse,
            options: vec![],
            correct_answer: Some("true".to_string()),
            points,
            explanation: None,
        }
    }

    fn attempt(student_id: &str, score: u32, max_score: u32, time_spent: u32) -> Submission {
        Submission {
            id: uuid::Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            attempt_number: 1,
            answers: vec![],
            score,
            max_score,
            passed: false,
            started_at: Utc::now(),
            completed_at: Utc::now(),
            time_spent,
        }
    }

    fn quiz_worth(points: u32) -> Quiz {
        Quiz::new("i-1", "Quiz", "", vec![question(points)], QuizSettings::default())
    }

    #[test]
    fn test_not_started_record() {
        let record = progress_record(&quiz_worth(4), "s-1");
        assert_eq!(record.status, ProgressStatus::NotStarted);
        assert_eq!(record.score, None);
        assert_eq!(record.max_score, 4);
        assert_eq!(record.attempts, 0);
        assert_eq!(record.time_spent, 0);
    }

    #[test]
    fn test_best_attempt_is_reported_and_time_is_summed() {
        let mut quiz = quiz_worth(10);
        quiz.settings.attempts_allowed = 3;
        quiz.submissions.push(attempt("s-1", 4, 10, 100));
        quiz.submissions.push(attempt("s-1", 9, 10, 60));
        quiz.submissions.push(attempt("s-2", 10, 10, 5));

        let record = progress_record(&quiz, "s-1");
        assert_eq!(record.status, ProgressStatus::Completed);
        assert_eq!(record.score, Some(9));
        assert_eq!(record.attempts, 2);
        assert_eq!(record.time_spent, 160);
        assert_eq!(record.max_attempts, 3);
    }

    #[test]
    fn test_best_attempt_is_chosen_by_percentage() {
        let mut quiz = quiz_worth(3);
        quiz.settings.attempts_allowed = 2;
        // Written against an older, larger question bank.
        quiz.submissions.push(attempt("s-1", 5, 10, 20));
        quiz.submissions.push(attempt("s-1", 3, 3, 20));

        let record = progress_record(&quiz, "s-1");
        assert_eq!(record.score, Some(3));
        assert_eq!(record.max_score, 3);
    }

    #[test]
    fn test_equal_attempts_report_the_latest() {
        let mut quiz = quiz_worth(4);
        quiz.settings.attempts_allowed = 2;
        let first = attempt("s-1", 2, 4, 10);
        let mut second = attempt("s-1", 2, 4, 10);
        second.completed_at = first.completed_at + Duration::minutes(5);
        let latest = second.completed_at;
        quiz.submissions.push(first);
        quiz.submissions.push(second);

        let record = progress_record(&quiz, "s-1");
        assert_eq!(record.completed_at, Some(latest));
    }

    #[test]
    fn test_time_totals_do_not_overflow() {
        let mut first = quiz_worth(1);
        first.settings.attempts_allowed = 2;
        first.submissions.push(attempt("s-1", 1, 1, u32::MAX));
        first.submissions.push(attempt("s-1", 0, 1, u32::MAX));
        let mut second = quiz_worth(1);
        second.submissions.push(attempt("s-1", 1, 1, u32::MAX));

        let records = vec![
            progress_record(&first, "s-1"),
            progress_record(&second, "s-1"),
        ];
        assert_eq!(records[0].time_spent, 2 * u64::from(u32::MAX));

        let stats = summarize(&records, Utc::now());
        assert_eq!(stats.total_time_spent, 3 * u64::from(u32::MAX));
    }

    #[test]
    fn test_average_of_fifty_and_eighty_is_sixty_five() {
        let mut first = quiz_worth(100);
        first.submissions.push(attempt("s-1", 50, 100, 10));
        let mut second = quiz_worth(100);
        second.submissions.push(attempt("s-1", 80, 100, 20));

        let records = vec![
            progress_record(&first, "s-1"),
            progress_record(&second, "s-1"),
        ];
        let stats = summarize(&records, Utc::now());
        assert_eq!(stats.completed_quizzes, 2);
        assert_eq!(stats.average_score, 65.00);
        assert_eq!(stats.total_time_spent, 30);
    }

    #[test]
    fn test_no_completions_average_is_zero() {
        let stats = summarize(&[progress_record(&quiz_worth(1), "s-1")], Utc::now());
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.total_quizzes, 1);
    }

    #[test]
    fn test_due_dates_split_upcoming_and_overdue() {
        let now = Utc::now();
        let assign = |quiz: &mut Quiz, due: Option<DateTime<Utc>>| {
            quiz.assigned_to.push(Assignment {
                student_id: "s-1".to_string(),
                assigned_at: now - Duration::days(7),
                due_date: due,
                completed: false,
            });
        };

        let mut overdue = quiz_worth(1);
        assign(&mut overdue, Some(now - Duration::days(1)));
        let mut upcoming = quiz_worth(1);
        assign(&mut upcoming, Some(now + Duration::days(1)));
        let mut undated = quiz_worth(1);
        assign(&mut undated, None);
        let mut done_late = quiz_worth(1);
        assign(&mut done_late, Some(now - Duration::days(2)));
        done_late.submissions.push(attempt("s-1", 1, 1, 10));

        let records: Vec<ProgressRecord> = [&overdue, &upcoming, &undated, &done_late]
            .iter()
            .map(|quiz| progress_record(quiz, "s-1"))
            .collect();
        let stats = summarize(&records, now);
        assert_eq!(stats.overdue_quizzes, 1);
        assert_eq!(stats.upcoming_quizzes, 1);
        assert_eq!(stats.completed_quizzes, 1);
    }
}
