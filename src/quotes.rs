use serde::ser::{Serialize, SerializeMap, Serializer};

/// A champion whose name has been verified for this run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    pub name: String,
    /// Roster id, 0 when unknown or lookup is disabled.
    pub id: i64,
}

impl Entity {
    pub fn new(name: impl Into<String>, id: i64) -> Self {
        Entity {
            name: name.into(),
            id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRecord {
    pub quote_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub quotes: Vec<QuoteRecord>,
}

/// Insertion-ordered `section → (quote_id → text)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    sections: Vec<Section>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `name` afresh. A section that already exists keeps its position
    /// but loses its quotes.
    pub fn open(&mut self, name: &str) {
        match self.sections.iter_mut().find(|s| s.name == name) {
            Some(section) => section.quotes.clear(),
            None => self.sections.push(Section {
                name: name.to_string(),
                quotes: Vec::new(),
            }),
        }
    }

    /// Set `quote_id` in `section` (opened if missing). Returns the text it replaced.
    pub fn insert(&mut self, section: &str, quote_id: &str, text: &str) -> Option<String> {
        if !self.contains_section(section) {
            self.open(section);
        }
        let quotes = &mut self
            .sections
            .iter_mut()
            .find(|s| s.name == section)?
            .quotes;
        match quotes.iter_mut().find(|q| q.quote_id == quote_id) {
            Some(existing) => Some(std::mem::replace(&mut existing.text, text.to_string())),
            None => {
                quotes.push(QuoteRecord {
                    quote_id: quote_id.to_string(),
                    text: text.to_string(),
                });
                None
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, section: &str, quote_id: &str) -> Option<&str> {
        self.section(section)?
            .quotes
            .iter()
            .find(|q| q.quote_id == quote_id)
            .map(|q| q.text.as_str())
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    #[cfg(test)]
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn quote_count(&self) -> usize {
        self.sections.iter().map(|s| s.quotes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

struct QuotesOf<'a>(&'a [QuoteRecord]);

impl Serialize for QuotesOf<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for q in self.0 {
            map.serialize_entry(&q.quote_id, &q.text)?;
        }
        map.end()
    }
}

impl Serialize for SectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for s in &self.sections {
            map.serialize_entry(&s.name, &QuotesOf(&s.quotes))?;
        }
        map.end()
    }
}

/// Everything extracted for one champion; the unit written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityResult {
    pub entity: Entity,
    pub quotes: SectionMap,
}

impl EntityResult {
    /// JSON value stored under the champion's name.
    pub fn to_value(&self, include_id: bool) -> serde_json::Result<serde_json::Value> {
        let quotes = serde_json::to_value(&self.quotes)?;
        if include_id {
            Ok(serde_json::json!({ "champ_id": self.entity.id, "quotes": quotes }))
        } else {
            Ok(quotes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_keep_insertion_order() {
        let mut map = SectionMap::new();
        map.insert("Taunt", "a", "1");
        map.insert("Joke", "b", "2");
        map.insert("Attack", "c", "3");
        let names: Vec<_> = map.section_names().collect();
        assert_eq!(names, ["Taunt", "Joke", "Attack"]);
    }

    #[test]
    fn reopening_clears_in_place() {
        let mut map = SectionMap::new();
        map.insert("Taunt", "a", "1");
        map.insert("Joke", "b", "2");
        map.open("Taunt");
        assert_eq!(map.section("Taunt").unwrap().quotes.len(), 0);
        assert_eq!(map.section_names().next(), Some("Taunt"));
    }

    #[test]
    fn insert_reports_replaced_text() {
        let mut map = SectionMap::new();
        assert_eq!(map.insert("Taunt", "a", "old"), None);
        assert_eq!(map.insert("Taunt", "a", "new").as_deref(), Some("old"));
        assert_eq!(map.get("Taunt", "a"), Some("new"));
        assert_eq!(map.quote_count(), 1);
    }

    #[test]
    fn serializes_as_ordered_objects() {
        let mut map = SectionMap::new();
        map.insert("Taunt", "Ahri_Taunt", "Catch me if you can!");
        map.insert("Taunt", "Ahri_Taunt.2", "Again!");
        map.insert("Joke", "Ahri_Joke", "Ha");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(
            json,
            r#"{"Taunt":{"Ahri_Taunt":"Catch me if you can!","Ahri_Taunt.2":"Again!"},"Joke":{"Ahri_Joke":"Ha"}}"#
        );
    }

    #[test]
    fn value_with_id() {
        let mut quotes = SectionMap::new();
        quotes.insert("Taunt", "t", "x");
        let result = EntityResult {
            entity: Entity::new("Ahri", 103),
            quotes,
        };
        let v = result.to_value(true).unwrap();
        assert_eq!(v["champ_id"], 103);
        assert_eq!(v["quotes"]["Taunt"]["t"], "x");
        let bare = result.to_value(false).unwrap();
        assert_eq!(bare["Taunt"]["t"], "x");
    }
}
