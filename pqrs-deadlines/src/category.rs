// Regulatory request categories and their allotted response times
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// PQRS request classification
///
/// Unknown inputs parse to [`RequestCategory::Unclassified`] instead of
/// failing, so intake is never blocked on a misclassified request. The
/// default arm resolves to the longest response window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestCategory {
    Petition,
    Complaint,
    Claim,
    Suggestion,
    Denunciation,
    Commendation,
    /// Fail-open arm for categories outside the regulatory table
    Unclassified,
}

impl RequestCategory {
    /// Allotted response time in business days.
    ///
    /// Denunciations get a shortened 10-day window, commendations only
    /// need a 5-day acknowledgement; everything else, including
    /// unclassified input, gets the standard 15 days.
    pub fn allotted_business_days(&self) -> u32 {
        match self {
            RequestCategory::Denunciation => 10,
            RequestCategory::Commendation => 5,
            RequestCategory::Petition
            | RequestCategory::Complaint
            | RequestCategory::Claim
            | RequestCategory::Suggestion
            | RequestCategory::Unclassified => 15,
        }
    }

    /// Case-insensitive parse; never fails.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "petition" => RequestCategory::Petition,
            "complaint" => RequestCategory::Complaint,
            "claim" => RequestCategory::Claim,
            "suggestion" => RequestCategory::Suggestion,
            "denunciation" => RequestCategory::Denunciation,
            "commendation" => RequestCategory::Commendation,
            _ => RequestCategory::Unclassified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestCategory::Petition => "petition",
            RequestCategory::Complaint => "complaint",
            RequestCategory::Claim => "claim",
            RequestCategory::Suggestion => "suggestion",
            RequestCategory::Denunciation => "denunciation",
            RequestCategory::Commendation => "commendation",
            RequestCategory::Unclassified => "unclassified",
        }
    }
}

impl FromStr for RequestCategory {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RequestCategory::parse(s))
    }
}

impl fmt::Display for RequestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allotted business days for a raw category string.
pub fn allotted_days(category: &str) -> u32 {
    RequestCategory::parse(category).allotted_business_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_table() {
        assert_eq!(RequestCategory::Petition.allotted_business_days(), 15);
        assert_eq!(RequestCategory::Complaint.allotted_business_days(), 15);
        assert_eq!(RequestCategory::Claim.allotted_business_days(), 15);
        assert_eq!(RequestCategory::Suggestion.allotted_business_days(), 15);
        assert_eq!(RequestCategory::Denunciation.allotted_business_days(), 10);
        assert_eq!(RequestCategory::Commendation.allotted_business_days(), 5);
    }

    #[test]
    fn test_unknown_category_defaults_to_fifteen() {
        assert_eq!(RequestCategory::parse("UNKNOWN_TYPE"), RequestCategory::Unclassified);
        assert_eq!(allotted_days("UNKNOWN_TYPE"), 15);
        assert_eq!(allotted_days(""), 15);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(RequestCategory::parse("Denunciation"), RequestCategory::Denunciation);
        assert_eq!(RequestCategory::parse("COMMENDATION"), RequestCategory::Commendation);
        assert_eq!(allotted_days("denunciation"), 10);
    }

    #[test]
    fn test_display_round_trip() {
        let category: RequestCategory = "claim".parse().unwrap();
        assert_eq!(category, RequestCategory::Claim);
        assert_eq!(category.to_string(), "claim");
    }
}
