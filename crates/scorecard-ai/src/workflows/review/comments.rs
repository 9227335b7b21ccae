use crate::workflows::scorecard::{Dimension, ScoreLineItem};

/// Deterministic review-comment suggestions for one line item, selected by
/// rating band, with a budget-variance extra for financial measures.
pub fn comment_suggestions(item: &ScoreLineItem) -> Vec<String> {
    let measure = item.measure.as_str();
    let mut suggestions: Vec<String> = if item.rating >= 4.5 {
        vec![
            format!(
                "Exceptional performance on {measure}. Consistently exceeds expectations and \
                 demonstrates outstanding commitment to excellence."
            ),
            format!(
                "Outstanding achievement in {measure}. Your dedication and results \
                 significantly contribute to team success."
            ),
            format!(
                "Exemplary work on {measure}. Continue maintaining this high standard and \
                 consider sharing best practices with the team."
            ),
        ]
    } else if item.rating >= 3.5 {
        vec![
            format!(
                "Strong performance on {measure}. Consistently meets and often exceeds targets \
                 with quality work."
            ),
            format!(
                "Solid achievement in {measure}. Shows good understanding and execution of \
                 responsibilities."
            ),
            format!(
                "Commendable work on {measure}. Keep up the good momentum and look for \
                 opportunities to further excel."
            ),
        ]
    } else if item.rating >= 3.0 {
        vec![
            format!(
                "Satisfactory performance on {measure}. Meets core expectations and shows \
                 potential for growth."
            ),
            format!(
                "Adequate performance in {measure}. Focus on consistency and identifying areas \
                 for improvement."
            ),
            format!(
                "Meets baseline requirements for {measure}. Consider setting stretch goals to \
                 demonstrate higher capabilities."
            ),
        ]
    } else {
        vec![
            format!(
                "{measure} requires improvement. Let's work together to identify obstacles and \
                 create an action plan for better results."
            ),
            format!(
                "Performance on {measure} is below target. Schedule a one-on-one to discuss \
                 challenges and support needed."
            ),
            format!(
                "{measure} needs focused attention. Consider additional training or resources \
                 to strengthen this area."
            ),
        ]
    };

    if item.dimension == Dimension::Financial && item.actual > 0.0 && item.target > 0.0 {
        let variance = (item.actual - item.target) / item.target * 100.0;
        if item.actual < item.target {
            suggestions.push(format!(
                "Excellent cost management with {:.1}% savings. This demonstrates strong \
                 fiscal responsibility.",
                variance.abs()
            ));
        } else if item.actual > item.target {
            suggestions.push(format!(
                "Budget variance of {variance:.1}% needs attention. Let's review spending \
                 patterns and adjust accordingly."
            ));
        }
    }

    suggestions
}
