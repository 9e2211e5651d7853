/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Object members keep the order they are written in. Any other expression is
/// converted through [`to_value`](crate::to_value); negative numbers inside
/// arrays or objects need parentheses.
///
/// # Examples
///
/// ```rust
/// use toon_binary::{toon, Value};
///
/// let user = toon!({
///     "name": "Alice",
///     "tags": ["admin", "ops"],
///     "balance": (-12.5),
///     "manager": null
/// });
///
/// let obj = user.as_object().unwrap();
/// let keys: Vec<_> = obj.keys().cloned().collect();
/// assert_eq!(keys, vec!["name", "tags", "balance", "manager"]);
/// assert_eq!(obj.get("balance").and_then(Value::as_f64), Some(-12.5));
/// ```
#[macro_export]
macro_rules! toon {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::toon!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::ToonMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ToonMap::new();
        $(
            object.insert($key.to_string(), $crate::toon!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Anything else: numbers, strings, parenthesized or serializable expressions.
    ($s:expr) => {
        $crate::to_value(&$s).unwrap_or($crate::Value::Null)
    };
}
