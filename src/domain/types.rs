//! Snapshot types read from the system of record

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Accepts either a string (uuid) or an integer identifier
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or integer identifier")
        }

        fn visit_str<E>(self, value: &str) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<String, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserialize_id(deserializer).map($name)
            }
        }
    };
}

id_newtype!(
    /// Barbershop identifier
    ShopId
);
id_newtype!(
    /// Barber identifier
    BarberId
);
id_newtype!(
    /// Queue entry identifier
    EntryId
);

/// Provider-assigned id of a delivered message (Twilio SID)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageId(pub String);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Nulls in nullable text/bool columns collapse to the type default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `timestamptz` columns carry an offset, plain `timestamp` columns do not (read as UTC)
fn deserialize_joined_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| D::Error::custom(format!("invalid joined_at {raw:?}: {e}")))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    /// Wait ceiling (minutes) for early notification of floating entries
    #[serde(default)]
    pub notify_threshold: Option<f64>,
}

impl Shop {
    /// Missing threshold behaves as zero: only the head of a queue qualifies
    pub fn threshold_minutes(&self) -> f64 {
        self.notify_threshold.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Barber {
    pub id: BarberId,
    /// Average service time in minutes; zero, negative or null falls back to the default
    #[serde(default)]
    pub average_cut_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueueEntry {
    pub id: EntryId,
    /// `None` means any barber
    #[serde(default)]
    pub requested_barber_id: Option<BarberId>,
    #[serde(deserialize_with = "deserialize_joined_at")]
    pub joined_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notified: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone_number: String,
}

impl QueueEntry {
    /// Whether this entry belongs in `barber`'s queue view
    pub fn is_relevant_to(&self, barber: &BarberId) -> bool {
        match &self.requested_barber_id {
            Some(requested) => requested == barber,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_queue_entry_row() {
        let json = r#"{
            "id": "8d4c2f0e-1111-4c3a-9f7e-000000000001",
            "shop_id": 3,
            "status": "waiting",
            "requested_barber_id": 7,
            "joined_at": "2024-05-01T10:15:00.123456+00:00",
            "notified": false,
            "customer_name": "Sam",
            "phone_number": "+61400000000"
        }"#;

        let entry: QueueEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id.as_str(), "8d4c2f0e-1111-4c3a-9f7e-000000000001");
        assert_eq!(entry.requested_barber_id, Some(BarberId::from("7")));
        assert!(!entry.notified);
        assert_eq!(entry.customer_name, "Sam");
    }

    #[test]
    fn test_deserialize_nulls() {
        let json = r#"{
            "id": 12,
            "requested_barber_id": null,
            "joined_at": "2024-05-01T10:15:00",
            "notified": null,
            "customer_name": null,
            "phone_number": null
        }"#;

        let entry: QueueEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, EntryId::from("12"));
        assert_eq!(entry.requested_barber_id, None);
        assert!(!entry.notified);
        assert!(entry.customer_name.is_empty());
        assert_eq!(entry.joined_at.to_rfc3339(), "2024-05-01T10:15:00+00:00");
    }

    #[test]
    fn test_invalid_joined_at_rejected() {
        let json = r#"{"id": 1, "joined_at": "yesterday"}"#;
        assert!(serde_json::from_str::<QueueEntry>(json).is_err());
    }

    #[test]
    fn test_shop_threshold_defaults_to_zero() {
        let shop: Shop = serde_json::from_str(r#"{"id": 1, "notify_threshold": null}"#).unwrap();
        assert_eq!(shop.threshold_minutes(), 0.0);

        let shop: Shop = serde_json::from_str(r#"{"id": 1, "notify_threshold": 20}"#).unwrap();
        assert_eq!(shop.threshold_minutes(), 20.0);
    }

    #[test]
    fn test_fractional_minutes_decode() {
        let shops: Vec<Shop> =
            serde_json::from_str(r#"[{"id": 1, "notify_threshold": 10.0}, {"id": 2, "notify_threshold": 7.5}]"#)
                .unwrap();
        assert_eq!(shops[0].threshold_minutes(), 10.0);
        assert_eq!(shops[1].threshold_minutes(), 7.5);

        let barbers: Vec<Barber> = serde_json::from_str(
            r#"[{"id": 1, "average_cut_time": 12.5}, {"id": 2, "average_cut_time": 20}]"#,
        )
        .unwrap();
        assert_eq!(barbers[0].average_cut_time, Some(12.5));
        assert_eq!(barbers[1].average_cut_time, Some(20.0));
    }

    #[test]
    fn test_is_relevant_to() {
        let barber = BarberId::from("b1");
        let mut entry: QueueEntry =
            serde_json::from_str(r#"{"id": 1, "joined_at": "2024-05-01T10:00:00Z"}"#).unwrap();
        assert!(entry.is_relevant_to(&barber));

        entry.requested_barber_id = Some(BarberId::from("b1"));
        assert!(entry.is_relevant_to(&barber));

        entry.requested_barber_id = Some(BarberId::from("b2"));
        assert!(!entry.is_relevant_to(&barber));
    }
}
