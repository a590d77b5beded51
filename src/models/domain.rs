use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Adoptable dog as returned by the bulk lookup endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dog {
    pub id: String,
    pub img: String,
    pub name: String,
    pub age: u32,
    pub zip_code: String,
    pub breed: String,
}

/// ZIP code location record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub zip_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub state: String,
    pub county: String,
}

impl Location {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.latitude,
            lon: self.longitude,
        }
    }

    /// "City, ST (zip)" label used by the location picker
    pub fn label(&self) -> String {
        format!("{}, {} ({})", self.city, self.state, self.zip_code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Field the dog search can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Breed,
    Name,
    Age,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Breed => "breed",
            SortField::Name => "name",
            SortField::Age => "age",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort specification, rendered on the wire as `<field>:<direction>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Breed,
            direction: SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field.as_str(), self.direction.as_str())
    }
}

impl FromStr for SortSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = s
            .split_once(':')
            .ok_or_else(|| format!("expected <field>:<direction>, got '{}'", s))?;

        let field = match field.trim() {
            "breed" => SortField::Breed,
            "name" => SortField::Name,
            "age" => SortField::Age,
            other => return Err(format!("unknown sort field '{}'", other)),
        };
        let direction = match direction.trim() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => return Err(format!("unknown sort direction '{}'", other)),
        };

        Ok(Self { field, direction })
    }
}

/// The 50 US state codes accepted by the location search
pub const US_STATES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA",
    "HI", "ID", "IL", "IN", "IA", "KS", "KY", "LA", "ME", "MD",
    "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC",
    "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV", "WI", "WY",
];

pub fn is_us_state(code: &str) -> bool {
    US_STATES.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_spec_wire_format() {
        let sort = SortSpec::new(SortField::Age, SortDirection::Asc);
        assert_eq!(sort.to_string(), "age:asc");
        assert_eq!(SortSpec::default().to_string(), "breed:asc");
    }

    #[test]
    fn test_sort_spec_parse() {
        let sort: SortSpec = "name:desc".parse().unwrap();
        assert_eq!(sort, SortSpec::new(SortField::Name, SortDirection::Desc));

        assert!("name".parse::<SortSpec>().is_err());
        assert!("zip:asc".parse::<SortSpec>().is_err());
        assert!("age:up".parse::<SortSpec>().is_err());
    }

    #[test]
    fn test_dog_deserialize() {
        let json = r#"{"id":"d1","img":"https://img/1.jpg","name":"Rex","age":3,"zip_code":"10001","breed":"Boxer"}"#;
        let dog: Dog = serde_json::from_str(json).unwrap();
        assert_eq!(dog.id, "d1");
        assert_eq!(dog.age, 3);
        assert_eq!(dog.zip_code, "10001");
    }

    #[test]
    fn test_location_label() {
        let location = Location {
            zip_code: "10001".to_string(),
            latitude: 40.75,
            longitude: -73.99,
            city: "New York".to_string(),
            state: "NY".to_string(),
            county: "New York".to_string(),
        };
        assert_eq!(location.label(), "New York, NY (10001)");
        assert!(is_us_state("NY"));
        assert!(!is_us_state("XX"));
    }
}
