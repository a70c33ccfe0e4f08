use serde::{Deserialize, Serialize};

/// Label used when no rule matches
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// A category label and the keywords that trigger it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryRule {
    pub label: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new<I, S>(label: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// `text` must already be lower-case
    fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

/// Ordered rule set; the first matching rule wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
    default_label: String,
}

impl CategoryRules {
    pub fn new(rules: Vec<CategoryRule>, default_label: impl Into<String>) -> Self {
        // Normalise keywords coming from config as well
        let rules = rules
            .into_iter()
            .map(|r| CategoryRule::new(r.label, r.keywords))
            .collect();
        Self {
            rules,
            default_label: default_label.into(),
        }
    }

    /// Built-in English / Roman Urdu table
    pub fn builtin() -> Vec<CategoryRule> {
        vec![
            CategoryRule::new(
                "Food",
                [
                    "chai", "tea", "khana", "food", "lunch", "dinner", "breakfast", "nashta",
                    "biryani", "roti", "doodh", "milk", "coffee", "burger", "pizza", "samosa",
                ],
            ),
            CategoryRule::new(
                "Transport",
                [
                    "petrol", "fuel", "diesel", "uber", "careem", "rickshaw", "bus", "taxi",
                    "parking", "train", "ticket",
                ],
            ),
            CategoryRule::new(
                "Bills",
                [
                    "bijli", "bill", "internet", "electricity", "gas", "paani", "water",
                    "mobile", "recharge", "rent", "kiraya",
                ],
            ),
            CategoryRule::new(
                "Groceries",
                ["sabzi", "grocery", "atta", "cheeni", "chawal", "daal", "anday", "fruit"],
            ),
            CategoryRule::new(
                "Health",
                ["dawai", "medicine", "doctor", "hospital", "pharmacy", "clinic"],
            ),
            CategoryRule::new(
                "Shopping",
                ["kapray", "clothes", "shoes", "joote", "shopping", "gift"],
            ),
            CategoryRule::new("Entertainment", ["movie", "cinema", "netflix", "game", "outing"]),
        ]
    }

    /// Label of the first rule with a keyword inside `text`, else the default
    pub fn classify(&self, text: &str) -> &str {
        let text = text.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.matches(&text))
            .map(|r| r.label.as_str())
            .unwrap_or(&self.default_label)
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::new(Self::builtin(), DEFAULT_CATEGORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let rules = CategoryRules::default();
        assert_eq!(rules.classify("500 ka petrol"), "Transport");
        assert_eq!(rules.classify("200 ki chai"), "Food");
        assert_eq!(rules.classify("bijli bill 1500"), "Bills");
        assert_eq!(rules.classify("internet 800"), "Bills");
        assert_eq!(rules.classify("1200 dawai"), "Health");
    }

    #[test]
    fn test_unmatched_falls_back_to_default() {
        let rules = CategoryRules::default();
        assert_eq!(rules.classify("300 something"), DEFAULT_CATEGORY);
    }

    #[test]
    fn test_first_rule_wins() {
        let rules = CategoryRules::new(
            vec![
                CategoryRule::new("A", ["chai"]),
                CategoryRule::new("B", ["chai", "petrol"]),
            ],
            "Other",
        );
        assert_eq!(rules.classify("chai and petrol"), "A");
        assert_eq!(rules.classify("petrol"), "B");
    }

    #[test]
    fn test_case_insensitive_keywords() {
        let rules = CategoryRules::new(vec![CategoryRule::new("Fuel", ["PETROL"])], "Other");
        assert_eq!(rules.classify("100 Petrol"), "Fuel");
    }

    #[test]
    fn test_classification_is_stable() {
        let rules = CategoryRules::default();
        let first = rules.classify("50 ka samosa").to_string();
        assert_eq!(rules.classify("50 ka samosa"), first);
    }
}
