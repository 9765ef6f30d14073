use serde_json::Value;

/// Decides whether a license lookup describes a usable license.
///
/// `records` is the body returned by the license check endpoint, an array of
/// `{"license": {...}}` objects. Only the first record is inspected. It is valid
/// when its `order_refunded` flag is present and is anything but `true`. An empty
/// or non-array body, or a missing or `null` flag, is treated as invalid.
#[must_use]
pub fn license_is_valid(records: &Value) -> bool {
    let Some(first) = records.as_array().and_then(|records| records.first()) else {
        return false;
    };

    match first
        .get("license")
        .and_then(|license| license.get("order_refunded"))
    {
        None | Some(Value::Null) | Some(Value::Bool(true)) => false,
        Some(_) => true,
    }
}
