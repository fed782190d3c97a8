//! Helpers for partial-update payloads.
//!
//! A nullable column in a PATCH body has three states: absent (leave it alone),
//! `null` (clear it), or a value. Such fields are declared as
//! `Option<Option<T>>` with `#[serde(default, deserialize_with = "nullable")]`.

use serde::{Deserialize, Deserializer};
use validator::{ValidateUrl, ValidationError};

pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Rejects a patched URL unless it is absent, cleared, or absolute.
pub fn check_url(field: &'static str, value: &Option<Option<String>>) -> Result<(), ValidationError> {
    match value {
        Some(Some(url)) if !url.validate_url() => {
            let mut err = ValidationError::new("url");
            err.message = Some(format!("{field} must be an absolute URL").into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        notes: Option<Option<String>>,
    }

    #[test]
    fn test_absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let cleared: Patch = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"notes": "call back"}"#).unwrap();

        assert_eq!(absent.notes, None);
        assert_eq!(cleared.notes, Some(None));
        assert_eq!(set.notes, Some(Some("call back".to_string())));
    }

    #[test]
    fn test_check_url() {
        assert!(check_url("url", &None).is_ok());
        assert!(check_url("url", &Some(None)).is_ok());
        assert!(check_url("url", &Some(Some("https://acme.dev/jobs/1".into()))).is_ok());
        assert!(check_url("url", &Some(Some("not a url".into()))).is_err());
    }
}
