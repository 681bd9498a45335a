use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to search a route
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1))]
    pub origin: String,
    #[validate(length(min = 1))]
    pub destination: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, alias = "query")]
    pub semantic_query: Option<String>,
    #[serde(default, alias = "include_hotels")]
    pub include_lodging: bool,
}

impl SearchRequest {
    /// User id to personalize for; `"guest"` and blank ids mean none
    pub fn effective_user_id(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && !id.eq_ignore_ascii_case("guest"))
    }

    pub fn effective_query(&self) -> Option<&str> {
        self.semantic_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

/// Query parameters for the lodging endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LodgingRequest {
    #[validate(length(min = 1))]
    pub city: String,
    #[serde(default)]
    #[validate(range(min = 1, max = 50))]
    pub k: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user_id: Option<&str>, query: Option<&str>) -> SearchRequest {
        SearchRequest {
            origin: "DXB".to_string(),
            destination: "LHR".to_string(),
            user_id: user_id.map(str::to_string),
            semantic_query: query.map(str::to_string),
            include_lodging: false,
        }
    }

    #[test]
    fn test_guest_user_id_is_ignored() {
        assert_eq!(request(Some("guest"), None).effective_user_id(), None);
        assert_eq!(request(Some("  "), None).effective_user_id(), None);
        assert_eq!(request(Some("u-1"), None).effective_user_id(), Some("u-1"));
    }

    #[test]
    fn test_blank_query_is_ignored() {
        assert_eq!(request(None, Some("   ")).effective_query(), None);
        assert_eq!(request(None, Some(" direct ")).effective_query(), Some("direct"));
    }

    #[test]
    fn test_empty_origin_fails_validation() {
        let mut req = request(None, None);
        req.origin = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_include_hotels_alias() {
        let req: SearchRequest = serde_json::from_str(
            r#"{"origin":"DXB","destination":"LHR","include_hotels":true}"#,
        )
        .unwrap();
        assert!(req.include_lodging);
    }
}
