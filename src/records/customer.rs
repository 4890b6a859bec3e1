//! CRM customers

crate::impl_record!(
    Customer,
    "customer",
    searchable: ["name", "email", "phone", "company", "tags"],
    filterable: ["status", "tier"],
    sortable: [
        "name": text,
        "lastContact": date descending,
        "totalCalls": number descending,
        "satisfaction": number descending,
    ],
    {
        name: String => "name",
        email: String => "email",
        phone: String => "phone",
        company: Option<String> => "company",
        status: String => "status",
        tier: String => "tier",
        tags: Vec<String> => "tags",
        last_contact: String => "lastContact",
        total_calls: u32 => "totalCalls",
        satisfaction: Option<f64> => "satisfaction",
    }
);
