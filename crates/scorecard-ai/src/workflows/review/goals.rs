use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::workflows::scorecard::Dimension;

const FINANCIAL_GOALS: [&str; 4] = [
    "Reduce departmental operating costs by 10% through process optimization",
    "Increase budget efficiency by identifying and eliminating redundant expenses",
    "Achieve 95% accuracy in budget forecasting and variance reporting",
    "Implement cost-saving initiatives that result in measurable ROI",
];

const CUSTOMER_GOALS: [&str; 4] = [
    "Improve internal stakeholder satisfaction scores by 15% through enhanced communication",
    "Achieve 90% positive feedback rating from external customers",
    "Reduce customer complaint resolution time by 25%",
    "Build stronger collaborative relationships with 3+ peer departments",
];

const INTERNAL_PROCESS_GOALS: [&str; 4] = [
    "Streamline workflow to reduce process completion time by 20%",
    "Implement automation for repetitive tasks, saving 10 hours per week",
    "Achieve 98% quality compliance rate in deliverables",
    "Document and standardize 5 key processes for team efficiency",
];

const LEARNING_GROWTH_GOALS: [&str; 4] = [
    "Complete 40 hours of professional development training in relevant skills",
    "Mentor 2 junior team members in skill development",
    "Achieve certification in [relevant professional area]",
    "Share knowledge through 4 internal training sessions or workshops",
];

fn percent_token() -> &'static Regex {
    static PERCENT: OnceLock<Regex> = OnceLock::new();
    PERCENT.get_or_init(|| Regex::new(r"(\d+)%").expect("valid percent pattern"))
}

/// Goal templates for a dimension, personalized by the employee's overall
/// average: struggling employees get tightened percentage targets, strong
/// performers get stretched ones.
pub fn goal_suggestions(dimension: Dimension, average_rating: f64) -> Vec<String> {
    let templates = match dimension {
        Dimension::Financial => FINANCIAL_GOALS,
        Dimension::Customer => CUSTOMER_GOALS,
        Dimension::InternalProcess => INTERNAL_PROCESS_GOALS,
        Dimension::LearningGrowth => LEARNING_GROWTH_GOALS,
    };

    let shift: Option<i64> = if average_rating < 3.0 {
        Some(-5)
    } else if average_rating >= 4.0 {
        Some(5)
    } else {
        None
    };

    templates
        .iter()
        .map(|template| match shift {
            Some(delta) => shift_percentages(template, delta).into_owned(),
            None => (*template).to_string(),
        })
        .collect()
}

fn shift_percentages(text: &str, delta: i64) -> Cow<'_, str> {
    percent_token().replace_all(text, |captures: &Captures<'_>| {
        let value: i64 = captures[1].parse().unwrap_or(0);
        format!("{}%", (value + delta).max(5))
    })
}
