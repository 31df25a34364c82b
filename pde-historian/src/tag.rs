use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Description and engineering unit for one historian tag.
///
/// Tab characters in either field are replaced with spaces on construction;
/// they would corrupt the tab-delimited export formats.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct TagMeta {
    pub description: String,
    pub unit: String,
}

impl TagMeta {
    pub fn new(description: &str, unit: &str) -> Self {
        TagMeta {
            description: description.replace('\t', " "),
            unit: unit.replace('\t', " "),
        }
    }

    /// Parse a tag metadata CSV string into a tag → metadata map.
    ///
    /// Expected CSV columns (with header): `TAG,DESCRIPTION,UNITS`
    pub fn parse_meta_csv(csv_object: &str) -> Result<HashMap<String, TagMeta>, std::io::Error> {
        let mut result: HashMap<String, TagMeta> = HashMap::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .from_reader(csv_object.as_bytes());
        for row in rdr.records() {
            let record = row?;
            let tag = record.get(0).unwrap_or("").trim().to_string();
            if tag.is_empty() {
                continue;
            }
            let description = record.get(1).unwrap_or("").trim();
            let unit = record.get(2).unwrap_or("").trim();
            result.insert(tag, TagMeta::new(description, unit));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::TagMeta;

    const META_CSV: &str = "TAG,DESCRIPTION,UNITS\n\
REACTOR1.TEMP,Reactor 1 outlet temperature,degC\n\
FEED.FLOW,Feed\tflow,m3/h\n";

    #[test]
    fn test_parse_meta_csv() {
        let meta = TagMeta::parse_meta_csv(META_CSV).unwrap();
        assert_eq!(meta.len(), 2);
        assert_eq!(
            meta["REACTOR1.TEMP"].description,
            "Reactor 1 outlet temperature"
        );
        assert_eq!(meta["REACTOR1.TEMP"].unit, "degC");
    }

    #[test]
    fn test_tabs_sanitized() {
        let meta = TagMeta::new("a\tb", "m3\t/h");
        assert_eq!(meta.description, "a b");
        assert_eq!(meta.unit, "m3 /h");
    }
}
