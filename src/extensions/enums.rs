use strum::IntoEnumIterator;

/// Every variant's serialized name, comma separated, for parse errors such
/// as "Valid views: day, week, ...".
pub fn valid_csv<T>() -> String
where
    T: IntoEnumIterator + AsRef<str>,
{
    let names: Vec<String> = T::iter().map(|v| v.as_ref().to_owned()).collect();
    names.join(", ")
}
