//! Registry of the GCIS open-data resources used by a lookup.

use std::fmt;

/// A logical GCIS query, bound to one upstream resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Existence flags for (Company, Branch, Business).
    CategorySearch,
    CompanyPrimary,
    CompanySecondary,
    /// Requires an IP licence on the caller side.
    Branch,
    /// Filtered by business number and registering agency.
    BusinessPrimary,
    /// May return several historical registrations for one number.
    BusinessSecondary,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::CategorySearch,
        Endpoint::CompanyPrimary,
        Endpoint::CompanySecondary,
        Endpoint::Branch,
        Endpoint::BusinessPrimary,
        Endpoint::BusinessSecondary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::CategorySearch => "category-search",
            Endpoint::CompanyPrimary => "company-primary",
            Endpoint::CompanySecondary => "company-secondary",
            Endpoint::Branch => "branch",
            Endpoint::BusinessPrimary => "business-primary",
            Endpoint::BusinessSecondary => "business-secondary",
        }
    }

    pub fn resource_id(self) -> &'static str {
        match self {
            Endpoint::CategorySearch => "673F0FC0-B3A7-429F-9041-E9866836B66D",
            Endpoint::CompanyPrimary => "5F64D864-61CB-4D0D-8AD9-492047CC1EA6",
            Endpoint::CompanySecondary => "236EE382-4942-41A9-BD03-CA0709025E7C",
            Endpoint::Branch => "23632BB3-5DB7-4423-9643-1D4AC140D479",
            Endpoint::BusinessPrimary => "7E6AFA72-AD6A-46D3-8681-ED77951D912D",
            Endpoint::BusinessSecondary => "426D5542-5F05-43EB-83F9-F1300F14E1F1",
        }
    }

    /// Filter fields in the order their values must be supplied.
    pub fn filter_fields(self) -> &'static [&'static str] {
        match self {
            Endpoint::CategorySearch => &["No"],
            Endpoint::CompanyPrimary | Endpoint::CompanySecondary => &["Business_Accounting_NO"],
            Endpoint::Branch => &["Branch_Office_Business_Accounting_NO"],
            Endpoint::BusinessPrimary => &["President_No", "Agency"],
            Endpoint::BusinessSecondary => &["President_No"],
        }
    }

    /// Builds the OData filter expression, e.g. `President_No eq 1 and Agency eq 2`.
    ///
    /// Returns `None` when the number of values does not match the endpoint's fields.
    pub fn filter_expression(self, values: &[&str]) -> Option<String> {
        let fields = self.filter_fields();
        if fields.len() != values.len() {
            return None;
        }

        let clauses: Vec<String> = fields
            .iter()
            .zip(values)
            .map(|(field, value)| format!("{} eq {}", field, value))
            .collect();

        Some(clauses.join(" and "))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
