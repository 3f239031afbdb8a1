use serde::Deserialize;

// the web client sends ids as numbers in some places and as strings in others
// (`"quiz_category": {"id": "3"}`), so accept both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawId")]
pub struct Id(pub i64);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Str(String),
}

impl TryFrom<RawId> for Id {
    type Error = String;

    fn try_from(value: RawId) -> Result<Self, Self::Error> {
        match value {
            RawId::Int(v) => Ok(Id(v)),
            RawId::Str(s) => match s.trim().parse::<i64>() {
                Ok(v) => Ok(Id(v)),
                Err(_) => Err(format!("Wrong value {s}, can not parse to i64")),
            },
        }
    }
}

pub fn ids(values: Vec<Id>) -> impl Iterator<Item = i64> {
    values.into_iter().map(|v| v.0)
}
