//! Knowledge-base articles

crate::impl_record!(
    Article,
    "article",
    searchable: ["title", "content", "tags"],
    filterable: ["category", "status"],
    sortable: [
        "title": text,
        "updatedAt": date descending,
        "views": number descending,
    ],
    {
        title: String => "title",
        content: String => "content",
        category: String => "category",
        status: String => "status",
        tags: Vec<String> => "tags",
        updated_at: String => "updatedAt",
        views: u64 => "views",
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::run_query;
    use crate::core::query::QueryState;
    use crate::core::record::Record;

    fn article(id: &str, title: &str, category: &str, views: u64) -> Article {
        Article::with_id(
            id,
            title.to_string(),
            "How to reset a voicemail PIN".to_string(),
            category.to_string(),
            "published".to_string(),
            vec!["voicemail".to_string()],
            "2024-05-01".to_string(),
            views,
        )
    }

    #[test]
    fn test_category_all_is_no_constraint() {
        let articles = vec![
            article("1", "Voicemail", "telephony", 10),
            article("2", "Invoices", "billing", 20),
        ];
        let state = QueryState::new().with_filter("category", "all");
        assert_eq!(run_query(&articles, &state).len(), 2);
    }

    #[test]
    fn test_title_sort_is_alphabetical_not_bytewise() {
        let articles = vec![
            article("1", "zendesk sync", "ops", 1),
            article("2", "Agent setup", "ops", 1),
            article("3", "billing FAQ", "ops", 1),
        ];
        let state = QueryState::new().with_sort("title");

        let ids: Vec<&str> = run_query(&articles, &state).iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn test_views_range_filter() {
        let articles = vec![
            article("1", "A", "ops", 5),
            article("2", "B", "ops", 500),
        ];
        let state = QueryState::new().with_filter("views>", "100");

        let ids: Vec<&str> = run_query(&articles, &state).iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec!["2"]);
    }
}
