use serde_json::Value;

/// Response is a successfully decoded TrackVia response body.
/// Bodies carrying an `error` field never become a `Response`.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status of the response
    pub status: u16,

    /// Decoded JSON body
    pub data: Value,
}

impl Response {
    pub fn new(status: u16, data: Value) -> Self {
        Response { status, data }
    }

    /// Get the raw decoded body
    pub fn raw(&self) -> &Value {
        &self.data
    }

    /// Consume the response and return its body
    pub fn into_inner(self) -> Value {
        self.data
    }

    /// Apply unmarshals the response body into the provided type
    pub fn apply<T>(&self) -> Result<T, crate::error::TrackViaError>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_value(self.data.clone()).map_err(|e| e.into())
    }

    /// Get a value from the body by a slash-separated path.
    /// For example, "records/0/fields" reads the "fields" entry of the
    /// first element of the "records" array.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.data;

        for part in path.split('/').filter(|s| !s.is_empty()) {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(arr) => {
                    let index: usize = part.parse().ok()?;
                    arr.get(index)?
                }
                _ => return None,
            };
        }

        Some(current)
    }

    /// Get a string value from the body by a slash-separated path
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get(path).and_then(|v| v.as_str().map(|s| s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn view_response() -> Response {
        Response::new(
            200,
            json!({
                "name": "All Contacts",
                "records": [
                    {"id": 1, "fields": {"Name": "Ada"}},
                    {"id": 2, "fields": {"Name": "Grace"}}
                ]
            }),
        )
    }

    #[test]
    fn test_response_get() {
        let response = view_response();
        assert_eq!(response.get_string("name"), Some("All Contacts".to_string()));
        assert_eq!(
            response.get_string("records/1/fields/Name"),
            Some("Grace".to_string())
        );
        assert_eq!(response.get("records/1/id"), Some(&json!(2)));
    }

    #[test]
    fn test_response_get_missing() {
        let response = view_response();
        assert!(response.get("records/7").is_none());
        assert!(response.get("records/x").is_none());
        assert!(response.get("name/deeper").is_none());
        assert_eq!(response.get(""), Some(response.raw()));
    }

    #[test]
    fn test_response_apply() {
        #[derive(Deserialize)]
        struct Record {
            id: u64,
        }

        #[derive(Deserialize)]
        struct View {
            name: String,
            records: Vec<Record>,
        }

        let view: View = view_response().apply().unwrap();
        assert_eq!(view.name, "All Contacts");
        assert_eq!(view.records.len(), 2);
        assert_eq!(view.records[1].id, 2);
    }
}
