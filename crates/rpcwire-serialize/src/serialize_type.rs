use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Body serialization format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SerializeType {
    #[default]
    Json,
    MsgPack,
    Bincode,
}

impl SerializeType {
    /// Every supported format.
    pub const ALL: [SerializeType; 3] = [
        SerializeType::Json,
        SerializeType::MsgPack,
        SerializeType::Bincode,
    ];

    /// Lowercase name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            SerializeType::Json => "json",
            SerializeType::MsgPack => "msgpack",
            SerializeType::Bincode => "bincode",
        }
    }
}

impl fmt::Display for SerializeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SerializeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(SerializeType::Json),
            "msgpack" | "messagepack" | "rmp" => Ok(SerializeType::MsgPack),
            "bincode" => Ok(SerializeType::Bincode),
            _ => Err(format!("unknown serialization format: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in SerializeType::ALL {
            assert_eq!(kind.name().parse::<SerializeType>().unwrap(), kind);
        }
        assert_eq!(
            "MessagePack".parse::<SerializeType>().unwrap(),
            SerializeType::MsgPack
        );
        assert!("protobuf".parse::<SerializeType>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&SerializeType::MsgPack).unwrap(),
            "\"msgpack\""
        );
        let kind: SerializeType = serde_json::from_str("\"bincode\"").unwrap();
        assert_eq!(kind, SerializeType::Bincode);
    }
}
