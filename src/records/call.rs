//! Call log entries

crate::impl_record!(
    CallRecord,
    "call",
    searchable: ["caller", "number", "agent", "summary"],
    filterable: ["status", "direction", "agent"],
    sortable: [
        "date": date descending,
        "duration": number descending,
        "caller": text,
    ],
    {
        caller: String => "caller",
        number: String => "number",
        agent: String => "agent",
        direction: String => "direction",
        status: String => "status",
        date: String => "date",
        duration: u32 => "duration",
        summary: Option<String> => "summary",
    }
);
