//! Route discovery

use serde::Serialize;
use serde_json::Value;

/// A route exposed by a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub method: &'static str,
    pub url: String,
    pub description: &'static str,
}

impl Route {
    fn new(method: &'static str, url: String, description: &'static str) -> Self {
        Self {
            method,
            url,
            description,
        }
    }
}

/// Routes derived from the shape of each top-level key.
///
/// Keys containing a space cannot form a path segment and are skipped.
/// Output follows the document's key order. A document that is not an
/// object has no resources.
pub fn discover_routes(doc: &Value) -> Vec<Route> {
    let Value::Object(resources) = doc else {
        return Vec::new();
    };

    let mut routes = Vec::new();

    for (key, value) in resources {
        if key.contains(' ') {
            continue;
        }

        let collection = format!("/{}", key);

        match value {
            Value::Object(_) => {
                routes.push(Route::new("GET", collection.clone(), "Gets the entire resource"));
                routes.push(Route::new(
                    "PUT",
                    collection.clone(),
                    "Replaces the entire resource",
                ));
                routes.push(Route::new(
                    "PATCH",
                    collection,
                    "Partially updates the resource",
                ));
            }
            Value::Array(_) => {
                let item = format!("/{}/:id", key);

                routes.push(Route::new(
                    "GET",
                    collection.clone(),
                    "Gets the entire resource array",
                ));
                routes.push(Route::new(
                    "GET",
                    item.clone(),
                    "Gets a resource from resource array by id",
                ));
                routes.push(Route::new(
                    "POST",
                    collection,
                    "Creates a new resource and adds it to the resource array",
                ));
                routes.push(Route::new(
                    "PUT",
                    item.clone(),
                    "Replaces a resource from resource array with id",
                ));
                routes.push(Route::new(
                    "PATCH",
                    item.clone(),
                    "Partially updates a resource from resource array with id",
                ));
                routes.push(Route::new(
                    "DELETE",
                    item,
                    "Deletes a resource from resource array with id",
                ));
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                routes.push(Route::new("GET", collection.clone(), "Gets the entire resource"));
                routes.push(Route::new("PUT", collection, "Replaces the entire resource"));
            }
        }
    }

    routes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signature(routes: &[Route]) -> Vec<(&str, &str)> {
        routes
            .iter()
            .map(|r| (r.method, r.url.as_str()))
            .collect()
    }

    #[test]
    fn test_object_resource_routes() {
        let routes = discover_routes(&json!({"config": {"x": 1}}));

        assert_eq!(
            signature(&routes),
            vec![("GET", "/config"), ("PUT", "/config"), ("PATCH", "/config")]
        );
    }

    #[test]
    fn test_array_resource_routes() {
        let routes = discover_routes(&json!({"posts": []}));

        assert_eq!(
            signature(&routes),
            vec![
                ("GET", "/posts"),
                ("GET", "/posts/:id"),
                ("POST", "/posts"),
                ("PUT", "/posts/:id"),
                ("PATCH", "/posts/:id"),
                ("DELETE", "/posts/:id"),
            ]
        );
    }

    #[test]
    fn test_scalar_and_null_resource_routes() {
        let routes = discover_routes(&json!({"title": "x", "count": 3, "gone": null}));

        assert_eq!(
            signature(&routes),
            vec![
                ("GET", "/title"),
                ("PUT", "/title"),
                ("GET", "/count"),
                ("PUT", "/count"),
                ("GET", "/gone"),
                ("PUT", "/gone"),
            ]
        );
    }

    #[test]
    fn test_keys_with_spaces_are_skipped() {
        let routes = discover_routes(&json!({"hello world": [], "ok": true}));

        assert!(routes.iter().all(|r| !r.url.contains(' ')));
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn test_depends_only_on_shape() {
        let a = discover_routes(&json!({"posts": [{"id": 1}], "config": {"x": 1}, "n": 1}));
        let b = discover_routes(&json!({"posts": [], "config": {}, "n": "text"}));

        assert_eq!(a, b);
    }

    #[test]
    fn test_non_object_document_has_no_routes() {
        assert!(discover_routes(&json!([1, 2])).is_empty());
        assert!(discover_routes(&json!("x")).is_empty());
    }

    #[test]
    fn test_route_serializes_with_descriptions() {
        let routes = discover_routes(&json!({"config": {}}));
        let value = serde_json::to_value(&routes[0]).unwrap();

        assert_eq!(
            value,
            json!({"method": "GET", "url": "/config", "description": "Gets the entire resource"})
        );
    }
}
