/// Placeholder substituted with the analysed keyword.
pub const KEYWORD_PLACEHOLDER: &str = "{keyword}";

/// The fixed battery asked of every persona, in presentation order.
pub const QUESTION_TEMPLATES: [&str; 10] = [
    "What are the most important features or benefits someone looks for when searching for {keyword}?",
    "What are the most common questions or concerns before making a purchase related to {keyword}?",
    "What are the biggest challenges someone faces when looking for the right product or service related to {keyword}?",
    "How does the person typically research their options related to {keyword} and where do they look for information?",
    "What are the most effective ways to convince this person to make a purchase related to {keyword}?",
    "What are the most common objections when considering a purchase related to {keyword} and how can they be addressed?",
    "What are some unique or unconventional ways to market products or services related to {keyword}?",
    "How does the person typically compare different products or services related to {keyword} and what factors do they consider?",
    "What are the most common misconceptions or misunderstandings related to {keyword} and how can they be corrected?",
    "What are some emerging trends or developments in the {keyword} market and how can they be leveraged for an advantage?",
];

pub fn questions_for(keyword: &str) -> Vec<String> {
    QUESTION_TEMPLATES
        .iter()
        .map(|template| template.replace(KEYWORD_PLACEHOLDER, keyword))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_keyword_questions() {
        let questions = questions_for("running shoes");
        assert_eq!(questions.len(), 10);
        assert!(questions.iter().all(|q| q.contains("running shoes")));
        assert!(questions.iter().all(|q| !q.contains(KEYWORD_PLACEHOLDER)));
        assert_eq!(
            questions[9],
            "What are some emerging trends or developments in the running shoes market and how can they be leveraged for an advantage?"
        );
    }

    #[test]
    fn test_questions_are_distinct() {
        let mut questions = questions_for("coffee grinder");
        questions.sort();
        questions.dedup();
        assert_eq!(questions.len(), QUESTION_TEMPLATES.len());
    }
}
