//! Expense extractor - Turns free text into expense statements

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::domain::entities::{Amount, CategoryRules, ExpenseStatement};

/// Whole-word conjunctions ("and", Roman Urdu "aur") or a literal `,` / `&`
static CLAUSE_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:and|aur)\b|[,&]").expect("valid delimiter pattern"));

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digit pattern"));

/// Split lower-cased text into clauses, in order. Clauses are not trimmed.
pub fn split_clauses(text: &str) -> Vec<&str> {
    CLAUSE_DELIMITER.split(text).collect()
}

/// First run of decimal digits in the clause
pub fn first_amount(clause: &str) -> Option<Amount> {
    DIGITS
        .find(clause)
        .and_then(|m| Amount::from_digits(m.as_str()))
}

/// Pure extractor over a fixed category rule set
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    rules: CategoryRules,
}

impl Extractor {
    pub fn new(rules: CategoryRules) -> Self {
        Self { rules }
    }

    /// Extract one statement per clause that contains a number.
    ///
    /// Clauses without digits are dropped; the result keeps clause order and
    /// may be empty.
    pub fn extract(&self, text: &str) -> Vec<ExpenseStatement> {
        let text = text.to_lowercase();

        split_clauses(&text)
            .into_iter()
            .filter_map(|clause| {
                let amount = first_amount(clause)?;
                let raw = clause.trim();
                let category = self.rules.classify(raw);
                Some(ExpenseStatement::new(amount, category, raw))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CategoryRule, DEFAULT_CATEGORY};

    fn amounts(statements: &[ExpenseStatement]) -> Vec<String> {
        statements.iter().map(|s| s.amount().to_string()).collect()
    }

    #[test]
    fn test_petrol_and_chai() {
        let statements = Extractor::default().extract("500 ka petrol and 200 ki chai");

        assert_eq!(
            statements,
            vec![
                ExpenseStatement::new(Amount::from(500), "Transport", "500 ka petrol"),
                ExpenseStatement::new(Amount::from(200), "Food", "200 ki chai"),
            ]
        );
    }

    #[test]
    fn test_bills_with_comma() {
        let statements = Extractor::default().extract("bijli bill 1500, internet 800");

        assert_eq!(statements.len(), 2);
        assert!(statements.iter().all(|s| s.category() == "Bills"));
        assert_eq!(amounts(&statements), vec!["1500", "800"]);
        assert_eq!(statements[1].raw_text(), "internet 800");
    }

    #[test]
    fn test_no_digits_yields_nothing() {
        let extractor = Extractor::default();
        assert!(extractor.extract("just checking in").is_empty());
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("chai and petrol, bill & more").is_empty());
    }

    #[test]
    fn test_clauses_without_numbers_are_dropped() {
        let statements = Extractor::default().extract("hello, 300 ki sabzi aur thanks");
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].raw_text(), "300 ki sabzi");
        assert_eq!(statements[0].category(), "Groceries");
    }

    #[test]
    fn test_conjunctions_inside_words_do_not_split() {
        let statements = Extractor::default().extract("android charger 1500 and 100 ki chai");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].raw_text(), "android charger 1500");

        let statements = Extractor::default().extract("saurabh 400");
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].raw_text(), "saurabh 400");
    }

    #[test]
    fn test_all_delimiters() {
        let statements =
            Extractor::default().extract("1000 ka doodh aur 50 ki roti & 20 ka bus, 10 and 5");
        assert_eq!(amounts(&statements), vec!["1000", "50", "20", "10", "5"]);
    }

    #[test]
    fn test_uppercase_input_is_normalised() {
        let statements = Extractor::default().extract("500 KA PETROL AND 200 KI CHAI");
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].raw_text(), "500 ka petrol");
        assert_eq!(statements[0].category(), "Transport");
    }

    #[test]
    fn test_first_number_in_clause_wins() {
        let statements = Extractor::default().extract("2 plates biryani 700");
        assert_eq!(amounts(&statements), vec!["2"]);
    }

    #[test]
    fn test_large_amounts_are_kept() {
        let statements = Extractor::default().extract("99999999999999999999999 ka petrol");
        assert_eq!(statements[0].amount().as_str(), "99999999999999999999999");
    }

    #[test]
    fn test_default_category() {
        let statements = Extractor::default().extract("300 for something");
        assert_eq!(statements[0].category(), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_custom_rules() {
        let extractor = Extractor::new(CategoryRules::new(
            vec![CategoryRule::new("Fuel", ["petrol"])],
            "Misc",
        ));
        let statements = extractor.extract("500 ka petrol, 200 ki chai");
        assert_eq!(statements[0].category(), "Fuel");
        assert_eq!(statements[1].category(), "Misc");
    }

    #[test]
    fn test_never_more_statements_than_clauses() {
        let inputs = [
            "1 and 2 and 3",
            "1,2,3,4",
            "a 1 aur b & c 3",
            ",,,1",
            "10 & & 20",
        ];
        for input in inputs {
            let clauses = split_clauses(input).len();
            assert!(Extractor::default().extract(input).len() <= clauses, "{}", input);
        }
    }

    #[test]
    fn test_only_ascii_digits_are_amounts() {
        let extractor = Extractor::default();
        assert!(extractor.extract("۵۰۰ ka petrol").is_empty());

        let statements = extractor.extract("۵۰۰ ka petrol and 200 ki chai");
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].amount().as_str(), "200");
    }
}
