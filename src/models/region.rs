//! Region record as described by a feature's `properties` block.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use super::Level;

/// Properties of one catalog region.
///
/// Keys follow the dataset's spelling. String properties missing from the
/// source, `null` or not strings deserialize to the empty string; list
/// properties keep the distinction between absent (`None`) and
/// present-but-empty, and drop entries that are not strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    /// ISO 3166-1 alpha-2 code
    #[serde(
        rename = "iso1A2",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub iso1_a2: String,

    /// ISO 3166-1 alpha-3 code
    #[serde(
        rename = "iso1A3",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub iso1_a3: String,

    /// ISO 3166-1 numeric-3 code
    #[serde(
        rename = "iso1N3",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub iso1_n3: String,

    /// UN M49 numeric code
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub m49: String,

    /// Wikidata Q-ID
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub wikidata: String,

    #[serde(
        rename = "emojiFlag",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub emoji_flag: String,

    /// Country-code top level domain, including the leading dot
    #[serde(
        rename = "ccTLD",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub cc_tld: String,

    #[serde(
        rename = "nameEn",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub name_en: String,

    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,

    /// Sovereign country ID for non-country regions
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub country: String,

    /// IDs of the regions this one belongs to, in dataset order
    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient_list", skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,

    /// Raw level name; see [`Region::admin_level`]
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub level: String,

    #[serde(
        rename = "isoStatus",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub iso_status: String,

    #[serde(
        rename = "driveSide",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub drive_side: String,

    #[serde(
        rename = "callingCodes",
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub calling_codes: Option<Vec<String>>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => {
            debug!("Ignoring non-string property value {}", other);
            Ok(String::new())
        }
    }
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(None),
        other => {
            debug!("Ignoring non-list property value {}", other);
            return Ok(None);
        }
    };

    let strings = items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            other => {
                debug!("Skipping non-string list entry {}", other);
                None
            }
        })
        .collect();
    Ok(Some(strings))
}

impl Region {
    /// Parsed level, or `None` when the level name is not in the rank list
    pub fn admin_level(&self) -> Option<Level> {
        self.level.parse().ok()
    }

    /// Group IDs in dataset order (empty when the region has none)
    pub fn groups(&self) -> &[String] {
        self.groups.as_deref().unwrap_or_default()
    }

    /// Every non-empty string this region may be looked up by.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        [
            &self.id,
            &self.iso1_a2,
            &self.iso1_a3,
            &self.iso1_n3,
            &self.m49,
            &self.wikidata,
            &self.emoji_flag,
            &self.cc_tld,
            &self.name_en,
        ]
        .into_iter()
        .chain(self.aliases.iter().flatten())
        .map(String::as_str)
        .filter(|s| !s.is_empty())
    }

    /// Check whether the property named `prop` (dataset key) is populated.
    ///
    /// Strings count only when non-empty; list properties count whenever
    /// they were present in the source, even if empty. Unknown keys are
    /// never present.
    pub fn has_property(&self, prop: &str) -> bool {
        let text = match prop {
            "id" => &self.id,
            "iso1A2" => &self.iso1_a2,
            "iso1A3" => &self.iso1_a3,
            "iso1N3" => &self.iso1_n3,
            "m49" => &self.m49,
            "wikidata" => &self.wikidata,
            "emojiFlag" => &self.emoji_flag,
            "ccTLD" => &self.cc_tld,
            "nameEn" => &self.name_en,
            "country" => &self.country,
            "level" => &self.level,
            "isoStatus" => &self.iso_status,
            "driveSide" => &self.drive_side,
            "aliases" => return self.aliases.is_some(),
            "groups" => return self.groups.is_some(),
            "members" => return self.members.is_some(),
            "callingCodes" => return self.calling_codes.is_some(),
            _ => return false,
        };
        !text.is_empty()
    }
}
