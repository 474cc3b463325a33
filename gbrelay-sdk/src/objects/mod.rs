pub mod discord;
pub mod gameboost;

pub use discord::{AllowedMentions, DiscordMessage, Embed, EmbedField};
pub use gameboost::{Buyer, Game, ORDER_PURCHASED, Order, OrderEvent, Scalar, WebhookId};
