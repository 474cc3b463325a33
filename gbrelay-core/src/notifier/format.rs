//! Discord message layout for a purchased order.

use gbrelay_sdk::objects::{AllowedMentions, DiscordMessage, Embed, EmbedField, Order};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const COLOR_COMPLETED: u32 = 0x00ff00;
pub const COLOR_PENDING: u32 = 0xffcc00;
pub const COLOR_REFUNDED: u32 = 0xff0000;
pub const COLOR_DEFAULT: u32 = 0xff9900;

const CONTENT: &str = "@everyone 🛒 **New GameBoost order received!**";
const BOT_USERNAME: &str = "GameBoost Bot";
const EMBED_TITLE: &str = "🛒 New Order Purchased";

/// Side-bar colour for an order status.
pub fn status_color(status: &str) -> u32 {
    match status {
        "completed" => COLOR_COMPLETED,
        "pending" => COLOR_PENDING,
        "refunded" => COLOR_REFUNDED,
        _ => COLOR_DEFAULT,
    }
}

/// Build the notification for `order`, stamped with `timestamp`.
pub fn build_message(
    order: &Order,
    timestamp: OffsetDateTime,
) -> Result<DiscordMessage, time::error::Format> {
    let status = order.status();

    let fields = vec![
        EmbedField::new("Order ID", order.order_id(), true),
        EmbedField::new("Buyer", order.buyer_name(), true),
        EmbedField::new("Game", order.game_name(), false),
        EmbedField::new("Title", order.title(), false),
        EmbedField::new("Quantity", order.quantity(), true),
        EmbedField::new("Price", format!("${}", order.price()), true),
        EmbedField::new("Status", status, true),
    ];

    Ok(DiscordMessage {
        content: CONTENT.to_owned(),
        allowed_mentions: AllowedMentions {
            parse: vec!["everyone".to_owned()],
        },
        username: BOT_USERNAME.to_owned(),
        embeds: vec![Embed {
            title: EMBED_TITLE.to_owned(),
            color: status_color(status),
            fields,
            timestamp: timestamp.format(&Rfc3339)?,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gbrelay_sdk::objects::{Buyer, Game, Scalar};
    use time::macros::datetime;

    fn sample_order() -> Order {
        Order {
            id: Some(Scalar::from(42_i64)),
            buyer: Some(Buyer {
                username: Some("alice".to_owned()),
            }),
            game: Some(Game {
                name: Some("Chess".to_owned()),
            }),
            title: Some("Boost".to_owned()),
            quantity: Some(Scalar::from(1_i64)),
            price_usd: serde_json::from_str("9.99").ok(),
            price_eur: None,
            status: Some("completed".to_owned()),
        }
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color("completed"), 0x00ff00);
        assert_eq!(status_color("pending"), 0xffcc00);
        assert_eq!(status_color("refunded"), 0xff0000);
        assert_eq!(status_color("disputed"), 0xff9900);
        assert_eq!(status_color("Completed"), 0xff9900);
    }

    #[test]
    fn test_message_layout() {
        let message = build_message(&sample_order(), datetime!(2024-05-01 12:30:00 UTC)).unwrap();
        assert_eq!(message.username, "GameBoost Bot");
        assert_eq!(message.allowed_mentions.parse, vec!["everyone"]);
        assert!(message.content.starts_with("@everyone"));
        assert_eq!(message.embeds.len(), 1);

        let embed = &message.embeds[0];
        assert_eq!(embed.color, COLOR_COMPLETED);
        assert_eq!(embed.timestamp, "2024-05-01T12:30:00Z");

        let fields: Vec<(&str, &str, bool)> = embed
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str(), f.inline))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("Order ID", "42", true),
                ("Buyer", "alice", true),
                ("Game", "Chess", false),
                ("Title", "Boost", false),
                ("Quantity", "1", true),
                ("Price", "$9.99", true),
                ("Status", "completed", true),
            ]
        );
    }

    #[test]
    fn test_message_defaults() {
        let message =
            build_message(&Order::with_id("X1"), datetime!(2024-05-01 12:30:00 UTC)).unwrap();
        let embed = &message.embeds[0];
        assert_eq!(embed.color, COLOR_DEFAULT);
        let values: Vec<&str> = embed.fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(
            values,
            vec!["X1", "Unknown", "Unknown Game", "No Title", "1", "$N/A", "unknown"]
        );
    }

    #[test]
    fn test_integral_float_values_drop_fraction() {
        let mut order = Order::with_id(7_i64);
        order.quantity = serde_json::from_str("2.0").ok();
        order.price_usd = serde_json::from_str("10.0").ok();
        let message = build_message(&order, datetime!(2024-05-01 12:30:00 UTC)).unwrap();
        let fields = &message.embeds[0].fields;
        assert_eq!(fields[4].value, "2");
        assert_eq!(fields[5].value, "$10");
    }
}
