//! Payload types for GameBoost order webhooks.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Event name for a completed purchase, the only event that is relayed.
pub const ORDER_PURCHASED: &str = "item.order.purchased";

pub const DEFAULT_ORDER_ID: &str = "N/A";
pub const DEFAULT_BUYER: &str = "Unknown";
pub const DEFAULT_GAME: &str = "Unknown Game";
pub const DEFAULT_TITLE: &str = "No Title";
pub const DEFAULT_QUANTITY: &str = "1";
pub const DEFAULT_PRICE: &str = "N/A";
pub const DEFAULT_STATUS: &str = "unknown";

/// A webhook delivery as posted by GameBoost.
///
/// Any JSON document deserializes into an event. A missing or non-string
/// `event` becomes empty and a payload that is not an order object becomes
/// [`Order::default`], so authenticated deliveries are never rejected for
/// their shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct OrderEvent {
    pub event: String,
    pub payload: Order,
}

impl From<Value> for OrderEvent {
    fn from(mut value: Value) -> Self {
        let event = value
            .get("event")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let payload = value
            .get_mut("payload")
            .map(Value::take)
            .and_then(|payload| Order::deserialize(payload).ok())
            .unwrap_or_default();
        Self { event, payload }
    }
}

impl OrderEvent {
    /// Whether this delivery announces a purchase.
    pub fn is_purchase(&self) -> bool {
        self.event == ORDER_PURCHASED
    }

    /// The dedup key for this delivery, `{event}_{payload.id}`.
    pub fn webhook_id(&self) -> WebhookId {
        WebhookId::new(&self.event, self.payload.order_id())
    }
}

/// A JSON value GameBoost may send either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// Mirrors the sender's notion of "not set": an empty string or zero.
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Number(n) => n.as_f64() == Some(0.0),
            Scalar::Text(s) => s.is_empty(),
        }
    }
}

// Integral floats within the exactly representable range print without a
// fractional part, so `10.0` renders as `10`.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) if n.is_f64() => match n.as_f64() {
                Some(x) if x.fract() == 0.0 && x.abs() < MAX_EXACT_INT => {
                    write!(f, "{}", x as i64)
                }
                _ => write!(f, "{n}"),
            },
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_owned())
    }
}

/// Deserialize a field, treating a value of the wrong type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    #[serde(default, deserialize_with = "lenient")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// The order carried in an event payload.
///
/// Every field is optional and a field of the wrong type reads as missing.
/// The accessor methods apply the display defaults used in notifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub buyer: Option<Buyer>,
    #[serde(default, deserialize_with = "lenient")]
    pub game: Option<Game>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub quantity: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_usd: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_eur: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl Order {
    /// A bare order with only an id, useful as a starting point.
    pub fn with_id(id: impl Into<Scalar>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// The id as rendered in notifications and dedup keys.
    pub fn order_id(&self) -> String {
        self.id
            .as_ref()
            .map_or_else(|| DEFAULT_ORDER_ID.to_owned(), ToString::to_string)
    }

    pub fn buyer_name(&self) -> &str {
        non_empty(self.buyer.as_ref().and_then(|b| b.username.as_ref())).unwrap_or(DEFAULT_BUYER)
    }

    pub fn game_name(&self) -> &str {
        non_empty(self.game.as_ref().and_then(|g| g.name.as_ref())).unwrap_or(DEFAULT_GAME)
    }

    pub fn title(&self) -> &str {
        non_empty(self.title.as_ref()).unwrap_or(DEFAULT_TITLE)
    }

    pub fn quantity(&self) -> String {
        self.quantity
            .as_ref()
            .filter(|q| !q.is_blank())
            .map_or_else(|| DEFAULT_QUANTITY.to_owned(), ToString::to_string)
    }

    /// USD price if present, otherwise EUR, otherwise `N/A`.
    pub fn price(&self) -> String {
        [&self.price_usd, &self.price_eur]
            .into_iter()
            .flatten()
            .find(|p| !p.is_blank())
            .map_or_else(|| DEFAULT_PRICE.to_owned(), ToString::to_string)
    }

    pub fn status(&self) -> &str {
        non_empty(self.status.as_ref()).unwrap_or(DEFAULT_STATUS)
    }
}

/// Identifies one logical event occurrence across sender retries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WebhookId(String);

impl WebhookId {
    pub fn new(event: &str, order_id: impl fmt::Display) -> Self {
        Self(format!("{event}_{order_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WebhookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
