use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single catalog row, projected to the fields the web layer renders.
///
/// Deserialization follows the column names of the exported catalog table,
/// serialization uses plain field names for the JSON API.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct BookRecord {
    #[serde(rename(deserialize = "Book-Title"), alias = "title")]
    pub title: String,

    #[serde(rename(deserialize = "Book-Author"), alias = "author", default)]
    pub author: String,

    #[serde(
        rename(deserialize = "Year-Of-Publication"),
        alias = "year",
        default,
        deserialize_with = "string_or_number"
    )]
    pub year: String,

    #[serde(rename(deserialize = "Publisher"), alias = "publisher", default)]
    pub publisher: String,

    #[serde(
        rename(serialize = "image", deserialize = "Image-URL-M"),
        alias = "image",
        default
    )]
    pub image_url: String,

    #[serde(
        rename(deserialize = "ISBN"),
        alias = "isbn",
        default,
        deserialize_with = "string_or_number"
    )]
    pub isbn: String,
}

/// Entry of the precomputed popular list.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct PopularEntry {
    #[serde(flatten)]
    pub book: BookRecord,
    pub num_ratings: u64,
    pub avg_rating: f64,
}

// Exported tables carry years as integers and ISBNs as strings, but neither is
// guaranteed.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected a string or a number, got {}",
            other
        ))),
    }
}
