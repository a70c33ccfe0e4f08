//! Reply texts sent back to the user

use crate::domain::entities::ExpenseStatement;

/// Sent straight away in fire-and-forget mode
pub const RECEIVED: &str = "Got it! Recording your expenses.";

/// Sent when nothing in the message had an amount
pub const GUIDANCE: &str =
    "Sorry, I could not understand that. Try '<amount> ka <item>', e.g. '500 ka petrol'.";

pub fn saved(statements: &[ExpenseStatement]) -> String {
    let noun = if statements.len() == 1 { "expense" } else { "expenses" };
    let mut reply = format!("Saved {} {}:", statements.len(), noun);
    for statement in statements {
        reply.push_str(&format!(
            "\n- {} {} ({})",
            statement.amount(),
            statement.category(),
            statement.raw_text()
        ));
    }
    reply
}

pub fn partially_saved(saved: usize, failed: &[&ExpenseStatement]) -> String {
    let total = saved + failed.len();
    let failed_text: Vec<&str> = failed.iter().map(|s| s.raw_text()).collect();
    format!(
        "Saved {} of {} expenses. Could not save: {}. Please try again later.",
        saved,
        total,
        failed_text.join(", ")
    )
}

pub fn ledger_unavailable(statements: &[ExpenseStatement]) -> String {
    let understood: Vec<String> = statements.iter().map(|s| s.to_string()).collect();
    format!(
        "Understood {}, but could not save it because the expense sheet is not set up.",
        understood.join(", ")
    )
}
