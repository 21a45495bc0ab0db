//! Month-over-month comparison of two analytics results.

use shared::{CategoryExpense, Insight, InsightKind, MonthComparison, MonthlyAnalytics};

const TOP_CATEGORY_COUNT: usize = 3;

const LOW_SAVINGS_RATE: f64 = 20.0;
const HIGH_SAVINGS_RATE: f64 = 30.0;
const EXPENSE_SURGE: f64 = 15.0;
const EXPENSE_CUT: f64 = -10.0;
const INCOME_GROWTH: f64 = 10.0;

/// Percent change from `previous` to `current` relative to `base`; 0 when
/// `base` is 0.
fn percent_change(current: f64, previous: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        (current - previous) / base * 100.0
    }
}

pub fn savings_rate(analytics: &MonthlyAnalytics) -> f64 {
    if analytics.total_income > 0.0 {
        analytics.net_savings / analytics.total_income * 100.0
    } else {
        0.0
    }
}

/// Largest expense categories, descending. Ties keep their first-seen order.
pub fn top_categories(analytics: &MonthlyAnalytics) -> Vec<CategoryExpense> {
    let mut categories = analytics.expenses_by_category.clone();
    categories.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    categories.truncate(TOP_CATEGORY_COUNT);
    categories
}

fn insight(kind: InsightKind, message: &str) -> Insight {
    Insight {
        kind,
        message: message.to_string(),
    }
}

fn build_insights(savings_rate: f64, expense_change: f64, income_change: f64) -> Vec<Insight> {
    let mut insights = Vec::new();

    if savings_rate < LOW_SAVINGS_RATE {
        insights.push(insight(
            InsightKind::Warning,
            "Your savings rate is below 20%. Consider reducing non-essential expenses.",
        ));
    } else if savings_rate >= HIGH_SAVINGS_RATE {
        insights.push(insight(
            InsightKind::Positive,
            "Great job! Your savings rate is above 30%.",
        ));
    }

    if expense_change > EXPENSE_SURGE {
        insights.push(insight(
            InsightKind::Warning,
            "Your expenses increased by more than 15% compared to last month.",
        ));
    } else if expense_change < EXPENSE_CUT {
        insights.push(insight(
            InsightKind::Positive,
            "You've reduced your expenses by more than 10% since last month!",
        ));
    }

    if income_change > INCOME_GROWTH {
        insights.push(insight(
            InsightKind::Positive,
            "Your income increased by more than 10% compared to last month.",
        ));
    }

    if insights.is_empty() {
        insights.push(insight(
            InsightKind::Info,
            "Track your finances consistently to get personalized insights.",
        ));
    }

    insights
}

pub fn compare_months(current: MonthlyAnalytics, previous: MonthlyAnalytics) -> MonthComparison {
    let income_change = percent_change(
        current.total_income,
        previous.total_income,
        previous.total_income,
    );
    let expense_change = percent_change(
        current.total_expenses,
        previous.total_expenses,
        previous.total_expenses,
    );
    let savings_change = percent_change(
        current.net_savings,
        previous.net_savings,
        previous.net_savings.abs(),
    );
    let savings_rate = savings_rate(&current);

    MonthComparison {
        top_categories: top_categories(&current),
        insights: build_insights(savings_rate, expense_change, income_change),
        income_change,
        expense_change,
        savings_change,
        savings_rate,
        current,
        previous,
    }
}
