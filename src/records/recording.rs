//! Call recordings with transcripts

crate::impl_record!(
    Recording,
    "recording",
    searchable: ["title", "caller", "transcript", "tags"],
    filterable: ["category", "sentiment"],
    sortable: [
        "date": date descending,
        "duration": number descending,
        "title": text,
    ],
    {
        title: String => "title",
        caller: String => "caller",
        transcript: Option<String> => "transcript",
        category: String => "category",
        sentiment: String => "sentiment",
        tags: Vec<String> => "tags",
        date: String => "date",
        duration: u32 => "duration",
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::run_query;
    use crate::core::query::QueryState;
    use crate::core::record::Record;

    fn recording(id: &str, title: &str, transcript: Option<&str>, date: &str) -> Recording {
        Recording::with_id(
            id,
            title.to_string(),
            "Unknown caller".to_string(),
            transcript.map(str::to_string),
            "support".to_string(),
            "neutral".to_string(),
            vec!["qa".to_string()],
            date.to_string(),
            95,
        )
    }

    #[test]
    fn test_search_matches_transcript_text() {
        let recordings = vec![
            recording("1", "Billing call", Some("I was charged twice"), "2024-01-02"),
            recording("2", "Onboarding", None, "2024-01-03"),
        ];
        let state = QueryState::new().with_search("charged TWICE");

        let ids: Vec<&str> = run_query(&recordings, &state).iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn test_malformed_date_first_when_newest_first() {
        let recordings = vec![
            recording("1", "A", None, "2024-01-02"),
            recording("2", "B", None, "yesterday"),
            recording("3", "C", None, "2024-02-01"),
        ];
        let state = QueryState::new().with_sort("date");

        let ids: Vec<&str> = run_query(&recordings, &state).iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }
}
