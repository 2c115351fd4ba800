use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub category: String,
    pub link: String,
}

/// Search box plus category selector of the communications section. Empty
/// criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsFilter {
    pub term: String,
    pub category: String,
}

impl NewsFilter {
    pub fn new(term: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            category: category.into(),
        }
    }

    pub fn matches(&self, item: &NewsItem) -> bool {
        let term = self.term.trim().to_lowercase();
        let category = self.category.trim().to_lowercase();

        let term_matches = term.is_empty()
            || item.title.to_lowercase().contains(&term)
            || item.description.to_lowercase().contains(&term);
        let category_matches = category.is_empty() || item.category.to_lowercase() == category;

        term_matches && category_matches
    }

    /// Whether `category` is the one currently picked; the empty key stands
    /// for "all categories".
    pub fn selects(&self, category: &str) -> bool {
        self.category.trim().eq_ignore_ascii_case(category.trim())
    }

    /// Visible items in their original order; an empty result means the page
    /// shows its empty state.
    pub fn apply<'a>(&self, items: &'a [NewsItem]) -> Vec<&'a NewsItem> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, description: &str, category: &str) -> NewsItem {
        NewsItem {
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            link: String::new(),
        }
    }

    fn items() -> Vec<NewsItem> {
        vec![
            item("Parceria com federação de atletismo", "Novo acordo para 2026", "parcerias"),
            item("IA no monitoramento de redes", "Análise de sentimentos em tempo real", "tecnologia"),
            item("Copa regional de vôlei", "Cobertura completa do evento", "eventos"),
        ]
    }

    #[test]
    fn empty_filter_shows_everything() {
        let items = items();
        assert_eq!(NewsFilter::default().apply(&items).len(), 3);
    }

    #[test]
    fn term_searches_title_and_description_case_insensitively() {
        let items = items();
        let by_title = NewsFilter::new("  PARCERIA ", "").apply(&items);
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].category, "parcerias");

        let by_description = NewsFilter::new("sentimentos", "").apply(&items);
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].category, "tecnologia");
    }

    #[test]
    fn category_and_term_combine() {
        let items = items();
        assert_eq!(NewsFilter::new("", "Eventos").apply(&items).len(), 1);
        assert!(NewsFilter::new("parceria", "eventos").apply(&items).is_empty());
    }

    #[test]
    fn selected_category_is_reported() {
        let filter = NewsFilter::new("", "Eventos");
        assert!(filter.selects("eventos"));
        assert!(!filter.selects("parcerias"));
        assert!(!filter.selects(""));

        let all = NewsFilter::default();
        assert!(all.selects(""));
        assert!(!all.selects("eventos"));
    }
}
