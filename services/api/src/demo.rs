use crate::infra::{
    parse_quarter, InMemoryFeedbackRepository, InMemorySubmissionRepository, UniformClassifier,
};
use chrono::Utc;
use clap::Args;
use scorecard_ai::error::AppError;
use scorecard_ai::workflows::feedback::{CoreValue, FeedbackDraft, PeerFeedbackService};
use scorecard_ai::workflows::intake::HistoryImporter;
use scorecard_ai::workflows::recognition::{
    AwardPeriod, AwardScope, InMemoryNotificationStore, RatedEntry, RecognitionCandidate,
    RecognitionService,
};
use scorecard_ai::workflows::review::{synthesize, ReviewPeriod};
use scorecard_ai::workflows::scorecard::{
    plan_targets, Dimension, Frequency, Quarter, ScoreLineDraft, ScorecardService,
    ScorecardSubmission, SubmissionDraft, TargetEntry, TargetMode, PEER_REVIEW_MEASURE,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reporting year for the demo data
    #[arg(long, default_value_t = 2025)]
    pub(crate) year: i32,
    /// Reporting month for the demo data (1-12)
    #[arg(long, default_value_t = 9)]
    pub(crate) month: u32,
}

#[derive(Args, Debug)]
pub(crate) struct ReviewReportArgs {
    /// Legacy sheet CSV export holding the submission history
    #[arg(long)]
    pub(crate) history: PathBuf,
    /// Employee whose review should be synthesized
    #[arg(long)]
    pub(crate) employee_email: String,
    /// Display name used in the narrative (defaults to the email)
    #[arg(long)]
    pub(crate) employee_name: Option<String>,
    /// Review year
    #[arg(long)]
    pub(crate) year: i32,
    /// Quarter for a quarterly review (omit for a yearly review)
    #[arg(long, value_parser = parse_quarter)]
    pub(crate) quarter: Option<Quarter>,
}

pub(crate) fn run_review_report(args: ReviewReportArgs) -> Result<(), AppError> {
    let ReviewReportArgs {
        history,
        employee_email,
        employee_name,
        year,
        quarter,
    } = args;

    let mut submissions = HistoryImporter::from_path(history)?;
    submissions.retain(|submission| submission.employee_email == employee_email);

    let period = match quarter {
        Some(quarter) => ReviewPeriod::Quarterly { quarter },
        None => ReviewPeriod::Yearly,
    };
    let name = employee_name.unwrap_or_else(|| employee_email.clone());
    let review = synthesize(&name, &submissions, period, year);

    println!("Period review for {name} ({employee_email})");
    println!("Average rating: {:.2}", review.average_rating);
    println!("\n{}", review.summary);
    print_bucket("Strengths", &review.strengths);
    print_bucket("Improvement areas", &review.improvements);
    print_bucket("Suggested goals", &review.goals);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { year, month } = args;
    let quarter = Quarter::from_month(month);

    println!("Performance scorecard demo ({year}, month {month})");

    // Manager sets yearly targets; the planner fans them out per quarter.
    let targets = vec![
        target(Dimension::Financial, "Budget Management", 20_000.0, 15.0),
        target(
            Dimension::Customer,
            "External Customer Satisfaction",
            40.0,
            5.0,
        ),
        target(Dimension::InternalProcess, "Process Improvement", 48.0, 45.0),
        target(Dimension::LearningGrowth, "Training Hours", 160.0, 10.0),
    ];
    let planned = match plan_targets(targets, TargetMode::Yearly) {
        Ok(planned) => planned,
        Err(err) => {
            println!("  Target plan rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Yearly targets accepted and distributed across {} quarters",
        planned.len()
    );

    let submissions = Arc::new(InMemorySubmissionRepository::default());
    let scorecards = Arc::new(ScorecardService::new(submissions));

    let feedback_repository = Arc::new(InMemoryFeedbackRepository::default());
    let classifier = Arc::new(UniformClassifier { rating: 4.3 });
    let feedback = Arc::new(PeerFeedbackService::new(feedback_repository, classifier));

    // Peers rate Amara before her scorecards land so the fixed 25% line has data.
    let request = match feedback.request_feedback(
        "manager@example.org",
        "amara@example.org",
        "Amara Okafor",
        year,
        quarter,
        vec!["peer@example.org".to_string(), "amara@example.org".to_string()],
    ) {
        Ok(request) => request,
        Err(err) => {
            println!("  Feedback request rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Peer feedback requested from {} reviewer(s)",
        request.reviewers.len()
    );

    if let Err(err) = feedback.submit(demo_feedback_draft(&request.id)) {
        println!("  Feedback submission rejected: {}", err);
        return Ok(());
    }
    let aggregate = match feedback.aggregate_for("amara@example.org", year, quarter) {
        Ok(aggregate) => aggregate,
        Err(err) => {
            println!("  Feedback aggregate unavailable: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Peer aggregate: {} review(s), average {}",
        aggregate.count,
        aggregate
            .average_score
            .map(|score| format!("{score:.2}"))
            .unwrap_or_else(|| "no data".to_string())
    );

    // Three weekly submissions for Amara, one for Ben.
    let weekly_actuals = [(12.0, 4.0, 4200.0), (14.0, 3.5, 5000.0), (16.0, 5.0, 4600.0)];
    for (week, actuals) in weekly_actuals.into_iter().enumerate() {
        let draft = demo_draft(
            "amara@example.org",
            "Amara Okafor",
            year,
            month,
            week as u32 + 1,
            actuals,
        );
        match scorecards.submit(draft, Some(&aggregate), Utc::now()) {
            Ok(submission) => println!(
                "- Week {} recorded for Amara (total weighted score {:.2})",
                submission.week,
                submission.total_weighted_score()
            ),
            Err(err) => {
                println!("  Submission rejected: {}", err);
                return Ok(());
            }
        }
    }
    let ben = demo_draft(
        "ben@example.org",
        "Ben Carter",
        year,
        month,
        1,
        (10.0, 2.0, 5600.0),
    );
    if let Err(err) = scorecards.submit(ben, None, Utc::now()) {
        println!("  Submission rejected: {}", err);
        return Ok(());
    }

    let dashboard = match scorecards.dashboard("amara@example.org") {
        Ok(dashboard) => dashboard,
        Err(err) => {
            println!("  Dashboard unavailable: {}", err);
            return Ok(());
        }
    };
    println!(
        "\nDashboard: {} submissions | avg {:.2} | best {:.2} | lowest {:.2}",
        dashboard.total_submissions,
        dashboard.average_score,
        dashboard.best_score,
        dashboard.lowest_score
    );
    for entry in &dashboard.dimension_averages {
        println!(
            "  - {}: average rating {:.2}",
            entry.dimension_label, entry.average_rating
        );
    }

    let review = match scorecards.period_review(
        "amara@example.org",
        "Amara Okafor",
        ReviewPeriod::Quarterly { quarter },
        year,
    ) {
        Ok(review) => review,
        Err(err) => {
            println!("  Review unavailable: {}", err);
            return Ok(());
        }
    };
    println!("\n{}", review.summary);
    print_bucket("Strengths", &review.strengths);
    print_bucket("Improvement areas", &review.improvements);
    print_bucket("Suggested goals", &review.goals);

    // Recognition run over both employees' recorded history.
    let candidates = vec![
        candidate_from_history(
            &scorecards,
            "amara@example.org",
            "Amara Okafor",
            "Programs",
            aggregate.average_score,
        ),
        candidate_from_history(&scorecards, "ben@example.org", "Ben Carter", "Programs", None),
    ];
    let notifications = Arc::new(InMemoryNotificationStore::default());
    let recognition = RecognitionService::new(notifications.clone());
    let awards = match recognition.run(
        &candidates,
        &[
            AwardScope::Department("Programs".to_string()),
            AwardScope::Organization,
        ],
        AwardPeriod::Month(month),
        year,
        Utc::now(),
    ) {
        Ok(awards) => awards,
        Err(err) => {
            println!("  Recognition run failed: {}", err);
            return Ok(());
        }
    };
    println!("\nRecognition awards:");
    for award in &awards {
        println!(
            "  - {} -> {} ({}), score {:.2}, {} candidate(s)",
            award.award, award.employee_name, award.period, award.score, award.total_candidates
        );
    }
    for notification in notifications.notifications_for("amara@example.org") {
        println!("  Notification: {}", notification.title);
    }

    Ok(())
}

fn target(dimension: Dimension, measure: &str, value: f64, weight: f64) -> TargetEntry {
    TargetEntry {
        dimension,
        measure: measure.to_string(),
        target_value: value,
        weight,
        frequency: Frequency::Weekly,
    }
}

fn demo_draft(
    email: &str,
    name: &str,
    year: i32,
    month: u32,
    week: u32,
    (process_actual, training_actual, spend): (f64, f64, f64),
) -> SubmissionDraft {
    SubmissionDraft {
        employee_email: email.to_string(),
        employee_name: name.to_string(),
        job_title: "Program Officer".to_string(),
        division: "Programs".to_string(),
        level: Some("L3".to_string()),
        year,
        month,
        week,
        progress_frequency: Frequency::Weekly,
        scores: vec![
            line(Dimension::Financial, "Budget Management", 5000.0, spend, 15.0),
            line(
                Dimension::Customer,
                PEER_REVIEW_MEASURE,
                0.0,
                0.0,
                25.0,
            ),
            line(
                Dimension::Customer,
                "External Customer Satisfaction",
                10.0,
                9.0,
                5.0,
            ),
            line(
                Dimension::InternalProcess,
                "Process Improvement",
                48.0,
                process_actual,
                45.0,
            ),
            line(
                Dimension::LearningGrowth,
                "Training Hours",
                40.0,
                training_actual,
                10.0,
            ),
        ],
    }
}

fn line(
    dimension: Dimension,
    measure: &str,
    target: f64,
    actual: f64,
    weight: f64,
) -> ScoreLineDraft {
    ScoreLineDraft {
        dimension,
        measure: measure.to_string(),
        target,
        actual,
        weight: Some(weight),
        comment: None,
        evidence_link: None,
    }
}

fn demo_feedback_draft(request_id: &str) -> FeedbackDraft {
    let mut entries = BTreeMap::new();
    for core_value in CoreValue::ordered() {
        entries.insert(
            core_value,
            format!(
                "Amara consistently demonstrates {} in weekly program work, with concrete \
                 examples observed across the quarter.",
                core_value.label()
            ),
        );
    }
    FeedbackDraft {
        request_id: request_id.to_string(),
        reviewer_email: "peer@example.org".to_string(),
        entries,
        comments: Some("A dependable teammate quarter after quarter.".to_string()),
    }
}

fn candidate_from_history(
    scorecards: &ScorecardService<InMemorySubmissionRepository>,
    email: &str,
    name: &str,
    division: &str,
    peer_feedback_score: Option<f64>,
) -> RecognitionCandidate {
    let entries = scorecards
        .history(email)
        .map(|history| rated_entries(&history))
        .unwrap_or_default();
    RecognitionCandidate {
        email: email.to_string(),
        name: name.to_string(),
        division: division.to_string(),
        entries,
        peer_feedback_score,
    }
}

fn rated_entries(history: &[ScorecardSubmission]) -> Vec<RatedEntry> {
    history
        .iter()
        .flat_map(|submission| submission.scores.iter())
        .map(|item| RatedEntry {
            rating: item.rating,
            weight: item.weight_or_zero(),
        })
        .collect()
}

fn print_bucket(title: &str, entries: &[String]) {
    println!("{title}:");
    for entry in entries {
        println!("  - {entry}");
    }
}
