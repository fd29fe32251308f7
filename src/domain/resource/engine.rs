//! Collection and item operations over a JSON document

use serde_json::{Map, Value};

use crate::domain::DomainError;

fn as_object(doc: &Value) -> Result<&Map<String, Value>, DomainError> {
    match doc {
        Value::Object(map) => Ok(map),
        _ => Err(DomainError::validation("json file is not an object")),
    }
}

fn as_object_mut(doc: &mut Value) -> Result<&mut Map<String, Value>, DomainError> {
    match doc {
        Value::Object(map) => Ok(map),
        _ => Err(DomainError::validation("json file is not an object")),
    }
}

fn resource_not_found() -> DomainError {
    DomainError::not_found("resource does not exist in json")
}

fn item_not_found() -> DomainError {
    DomainError::not_found("resource with particular id not found")
}

fn collection<'a>(doc: &'a Value, key: &str) -> Result<&'a Vec<Value>, DomainError> {
    match as_object(doc)?.get(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(DomainError::validation("resource is not an array")),
        None => Err(resource_not_found()),
    }
}

fn collection_mut<'a>(doc: &'a mut Value, key: &str) -> Result<&'a mut Vec<Value>, DomainError> {
    match as_object_mut(doc)?.get_mut(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(DomainError::validation("resource is not an array")),
        None => Err(resource_not_found()),
    }
}

fn partial_fields(partial: Value) -> Result<Map<String, Value>, DomainError> {
    match partial {
        Value::Object(fields) => Ok(fields),
        _ => Err(DomainError::validation("request body is not an object")),
    }
}

/// String form of an item's `id` field.
///
/// Strings are taken verbatim, any other JSON value uses its textual
/// form, so `1` and `"1"` address the same item. Floats print in their
/// shortest form, so `1.0` is `1` as well. Non-objects and objects
/// without an `id` have no id and are never matched.
pub fn item_id(item: &Value) -> Option<String> {
    match item.as_object()?.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(n) if n.is_f64() => n.as_f64().map(|f| f.to_string()),
        other => Some(other.to_string()),
    }
}

fn position(items: &[Value], id: &str) -> Option<usize> {
    items
        .iter()
        .position(|item| item_id(item).as_deref() == Some(id))
}

pub fn get_resource<'a>(doc: &'a Value, key: &str) -> Result<&'a Value, DomainError> {
    as_object(doc)?.get(key).ok_or_else(resource_not_found)
}

/// First element of the array at `key` whose id matches
pub fn get_item<'a>(doc: &'a Value, key: &str, id: &str) -> Result<&'a Value, DomainError> {
    let items = collection(doc, key)?;
    position(items, id)
        .map(|index| &items[index])
        .ok_or_else(item_not_found)
}

/// Set `doc[key]`, creating the key when absent
pub fn replace_resource(doc: &mut Value, key: &str, value: Value) -> Result<(), DomainError> {
    as_object_mut(doc)?.insert(key.to_string(), value);
    Ok(())
}

/// Shallow-merge the fields of `partial` into the object at `key`
pub fn merge_resource(doc: &mut Value, key: &str, partial: Value) -> Result<(), DomainError> {
    let target = match as_object_mut(doc)?.get_mut(key) {
        Some(Value::Object(target)) => target,
        Some(_) => return Err(DomainError::validation("resource is not an object")),
        None => return Err(resource_not_found()),
    };

    target.extend(partial_fields(partial)?);
    Ok(())
}

pub fn create_item(doc: &mut Value, key: &str, item: Value) -> Result<(), DomainError> {
    collection_mut(doc, key)?.push(item);
    Ok(())
}

pub fn replace_item(doc: &mut Value, key: &str, id: &str, item: Value) -> Result<(), DomainError> {
    let items = collection_mut(doc, key)?;
    let index = position(items, id).ok_or_else(item_not_found)?;
    items[index] = item;
    Ok(())
}

pub fn merge_item(doc: &mut Value, key: &str, id: &str, partial: Value) -> Result<(), DomainError> {
    let fields = partial_fields(partial)?;
    let items = collection_mut(doc, key)?;
    let index = position(items, id).ok_or_else(item_not_found)?;

    if let Value::Object(target) = &mut items[index] {
        target.extend(fields);
    }
    Ok(())
}

/// Remove the first matching element; later elements shift down by one
pub fn delete_item(doc: &mut Value, key: &str, id: &str) -> Result<(), DomainError> {
    let items = collection_mut(doc, key)?;
    let index = position(items, id).ok_or_else(item_not_found)?;
    items.remove(index);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn posts() -> Value {
        json!({"posts": [{"id": "1", "title": "a"}]})
    }

    #[test]
    fn test_get_resource() {
        let doc = json!({"config": {"x": 1}, "name": "demo"});

        assert_eq!(get_resource(&doc, "config").unwrap(), &json!({"x": 1}));
        assert_eq!(get_resource(&doc, "name").unwrap(), &json!("demo"));
        assert!(matches!(
            get_resource(&doc, "missing"),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn test_resource_routes_require_object_document() {
        let mut doc = json!([1, 2, 3]);

        assert!(matches!(
            get_resource(&doc, "posts"),
            Err(DomainError::Validation { .. })
        ));
        assert!(matches!(
            replace_resource(&mut doc, "posts", json!([])),
            Err(DomainError::Validation { .. })
        ));
    }

    #[test]
    fn test_get_item_matches_stringified_id() {
        let doc = json!({"posts": [
            {"id": 1, "title": "numeric"},
            {"id": "2", "title": "string"},
            "not an object",
            {"title": "no id"}
        ]});

        assert_eq!(get_item(&doc, "posts", "1").unwrap()["title"], "numeric");
        assert_eq!(get_item(&doc, "posts", "2").unwrap()["title"], "string");
        assert!(matches!(
            get_item(&doc, "posts", "3"),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn test_float_ids_use_shortest_form() {
        let doc = json!({"posts": [
            {"id": 1.0, "title": "integral"},
            {"id": 2.5, "title": "fractional"}
        ]});

        assert_eq!(item_id(&doc["posts"][0]).as_deref(), Some("1"));
        assert_eq!(get_item(&doc, "posts", "1").unwrap()["title"], "integral");
        assert_eq!(get_item(&doc, "posts", "2.5").unwrap()["title"], "fractional");
        assert!(get_item(&doc, "posts", "1.0").is_err());
    }

    #[test]
    fn test_get_item_first_match_wins() {
        let doc = json!({"posts": [
            {"id": "1", "title": "first"},
            {"id": "1", "title": "second"}
        ]});

        assert_eq!(get_item(&doc, "posts", "1").unwrap()["title"], "first");
    }

    #[test]
    fn test_item_operations_require_array() {
        let mut doc = json!({"config": {"id": "1"}});

        assert!(matches!(
            get_item(&doc, "config", "1"),
            Err(DomainError::Validation { .. })
        ));
        assert!(matches!(
            create_item(&mut doc, "config", json!({})),
            Err(DomainError::Validation { .. })
        ));
        assert!(matches!(
            delete_item(&mut doc, "config", "1"),
            Err(DomainError::Validation { .. })
        ));
    }

    #[test]
    fn test_replace_resource_creates_missing_key() {
        let mut doc = posts();
        replace_resource(&mut doc, "tags", json!(["x"])).unwrap();
        replace_resource(&mut doc, "posts", json!(null)).unwrap();

        assert_eq!(doc, json!({"posts": null, "tags": ["x"]}));
    }

    #[test]
    fn test_merge_resource_is_shallow() {
        let mut doc = json!({"config": {"x": 1, "nested": {"a": 1}, "keep": true}});
        merge_resource(&mut doc, "config", json!({"x": 2, "nested": {"b": 2}})).unwrap();

        assert_eq!(
            doc,
            json!({"config": {"x": 2, "nested": {"b": 2}, "keep": true}})
        );
    }

    #[test]
    fn test_merge_with_empty_partial_is_noop() {
        let mut doc = json!({"config": {"x": 1}, "posts": [{"id": "1", "title": "a"}]});
        let before = doc.clone();

        merge_resource(&mut doc, "config", json!({})).unwrap();
        merge_item(&mut doc, "posts", "1", json!({})).unwrap();

        assert_eq!(doc, before);
    }

    #[test]
    fn test_merge_resource_rejects_non_object_target_and_body() {
        let mut doc = json!({"config": {"x": 1}, "list": []});

        assert!(matches!(
            merge_resource(&mut doc, "list", json!({"x": 1})),
            Err(DomainError::Validation { .. })
        ));
        assert!(matches!(
            merge_resource(&mut doc, "config", json!([1])),
            Err(DomainError::Validation { .. })
        ));
        assert!(matches!(
            merge_resource(&mut doc, "missing", json!({})),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn test_create_item_appends() {
        let mut doc = posts();
        create_item(&mut doc, "posts", json!({"id": "2", "title": "b"})).unwrap();

        assert_eq!(
            doc,
            json!({"posts": [{"id": "1", "title": "a"}, {"id": "2", "title": "b"}]})
        );
    }

    #[test]
    fn test_replace_item_in_place() {
        let mut doc = json!({"posts": [
            {"id": "1", "title": "a"},
            {"id": "2", "title": "b"},
            {"id": "1", "title": "dup"}
        ]});
        replace_item(&mut doc, "posts", "1", json!({"id": "1", "body": "new"})).unwrap();

        assert_eq!(
            doc,
            json!({"posts": [
                {"id": "1", "body": "new"},
                {"id": "2", "title": "b"},
                {"id": "1", "title": "dup"}
            ]})
        );
    }

    #[test]
    fn test_merge_item_touches_only_matching_item() {
        let mut doc = json!({"posts": [{"id": "1", "title": "a"}, {"id": "2", "title": "b"}]});
        merge_item(&mut doc, "posts", "1", json!({"title": "c"})).unwrap();

        assert_eq!(
            doc,
            json!({"posts": [{"id": "1", "title": "c"}, {"id": "2", "title": "b"}]})
        );
    }

    #[test]
    fn test_delete_item_removes_first_match_only() {
        let mut doc = json!({"posts": [
            {"id": "1", "title": "first"},
            {"id": "2"},
            {"id": "1", "title": "second"}
        ]});
        delete_item(&mut doc, "posts", "1").unwrap();

        assert_eq!(
            doc,
            json!({"posts": [{"id": "2"}, {"id": "1", "title": "second"}]})
        );
        assert_eq!(get_item(&doc, "posts", "1").unwrap()["title"], "second");
    }

    #[test]
    fn test_delete_then_get_is_not_found() {
        let mut doc = posts();
        delete_item(&mut doc, "posts", "1").unwrap();

        assert!(matches!(
            get_item(&doc, "posts", "1"),
            Err(DomainError::NotFound { .. })
        ));
        assert_eq!(doc, json!({"posts": []}));
    }

    #[test]
    fn test_delete_missing_leaves_document_unchanged() {
        let mut doc = posts();
        let before = serde_json::to_vec(&doc).unwrap();

        assert!(matches!(
            delete_item(&mut doc, "posts", "9"),
            Err(DomainError::NotFound { .. })
        ));
        assert_eq!(serde_json::to_vec(&doc).unwrap(), before);
    }
}
