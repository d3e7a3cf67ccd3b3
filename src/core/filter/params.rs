use crate::errors::{AppError, AppResult};
use std::collections::BTreeMap;

/// Explicit string-keyed parameter source for the filter pipelines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    values: BTreeMap<String, String>,
}

impl FilterParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.trim().to_string(), value.to_string());
    }

    /// Value of `key`, or None when absent, empty or the literal "null".
    pub fn get(&self, key: &str) -> Option<&str> {
        match self.values.get(key).map(|v| v.trim()) {
            None | Some("") | Some("null") => None,
            Some(v) => Some(v),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.keys().all(|k| self.get(k).is_none())
    }

    /// Overlay `other`; its values win on shared keys.
    pub fn merge(mut self, other: FilterParams) -> Self {
        self.values.extend(other.values);
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Build from CLI `KEY=VALUE` pairs.
    pub fn from_pairs<S: AsRef<str>>(pairs: &[S]) -> AppResult<Self> {
        let mut params = Self::new();
        for raw in pairs {
            let raw = raw.as_ref();
            let (k, v) = raw.split_once('=').ok_or_else(|| {
                AppError::Validation(format!("filter '{raw}' must look like KEY=VALUE"))
            })?;
            if k.trim().is_empty() {
                return Err(AppError::Validation(format!("filter '{raw}' has an empty key")));
            }
            params.insert(k, v);
        }
        Ok(params)
    }

    /// Build from a raw query string (`status=pending&search=api+docs`),
    /// decoded as `application/x-www-form-urlencoded`.
    pub fn from_query_string(qs: &str) -> Self {
        let mut params = Self::new();
        for (k, v) in form_urlencoded::parse(qs.trim_start_matches('?').as_bytes()) {
            params.insert(&k, &v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_empty_and_null_are_all_missing() {
        let p = FilterParams::new().with("status", "").with("project_id", "null");
        assert_eq!(p.get("status"), None);
        assert_eq!(p.get("project_id"), None);
        assert_eq!(p.get("user_id"), None);
        assert!(p.is_empty());
    }

    #[test]
    fn pairs_split_on_first_equals() {
        let p = FilterParams::from_pairs(&["search=a=b", "is_paid=1"]).unwrap();
        assert_eq!(p.get("search"), Some("a=b"));
        assert_eq!(p.get("is_paid"), Some("1"));
    }

    #[test]
    fn pairs_without_equals_are_rejected() {
        assert!(FilterParams::from_pairs(&["status"]).is_err());
    }

    #[test]
    fn query_string_is_decoded() {
        let p = FilterParams::from_query_string("?status=pending&search=api+docs%21&tag_id=");
        assert_eq!(p.get("status"), Some("pending"));
        assert_eq!(p.get("search"), Some("api docs!"));
        assert_eq!(p.get("tag_id"), None);
    }

    #[test]
    fn stray_percent_signs_are_kept() {
        let p = FilterParams::from_query_string("search=100%&note=a%zzb&x=%C3%A9cole");
        assert_eq!(p.get("search"), Some("100%"));
        assert_eq!(p.get("note"), Some("a%zzb"));
        assert_eq!(p.get("x"), Some("école"));
    }

    #[test]
    fn explicit_pairs_override_query_string() {
        let base = FilterParams::from_query_string("status=pending&project_id=2");
        let p = base.merge(FilterParams::from_pairs(&["status=approved"]).unwrap());
        assert_eq!(p.get("status"), Some("approved"));
        assert_eq!(p.get("project_id"), Some("2"));
    }
}
